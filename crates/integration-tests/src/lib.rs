//! Integration tests for the Uphaar & Kyddoz storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p uphaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Cart merge, wishlist toggling, persistence, removal
//! - `catalog_fallback` - Remote-first lookups and static fallback policies
//! - `checkout_flow` - Pricing, validation and order submission
//! - `order_admin` - Order history and admin status updates
//!
//! Everything runs against in-memory doubles; no network is needed.

use std::path::PathBuf;
use std::sync::Arc;

use uphaar_core::{CartOptions, Product, WhatsAppNumber};
use uphaar_storefront::catalog::StaticCatalog;
use uphaar_storefront::config::StorefrontConfig;
use uphaar_storefront::services::messaging::ContactNumbers;
use uphaar_storefront::state::AppState;
use uphaar_storefront::storage::{LocalStorage, MemoryStorage};
use uphaar_storefront::store::MemoryStore;

/// Uphaar order number used by the fixtures.
pub const UPHAAR_NUMBER: &str = "919821141072";
/// Kyddoz order number used by the fixtures.
pub const KYDDOZ_NUMBER: &str = "918767174252";

/// Fixture contact numbers.
///
/// # Panics
///
/// If a fixture number fails to parse.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn contacts() -> ContactNumbers {
    ContactNumbers {
        uphaar: WhatsAppNumber::parse(UPHAAR_NUMBER).unwrap(),
        kyddoz: WhatsAppNumber::parse(KYDDOZ_NUMBER).unwrap(),
    }
}

/// Offline configuration with the fixture numbers.
#[must_use]
pub fn config() -> StorefrontConfig {
    StorefrontConfig {
        supabase: None,
        contacts: contacts(),
        data_dir: PathBuf::from(".storefront"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// The bundled catalog.
///
/// # Panics
///
/// If the bundled catalog is invalid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::bundled().unwrap())
}

/// A bundled product by id, for seeding remote rows.
///
/// # Panics
///
/// If the id is not in the bundled catalog.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn bundled_product(id: &str) -> Product {
    catalog().get(&id.into()).cloned().unwrap()
}

/// Build customization options from pairs, keeping their order.
#[must_use]
pub fn options(pairs: &[(&str, &str)]) -> CartOptions {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Test context: app state over a memory store and memory storage.
pub struct TestContext {
    pub store: MemoryStore,
    pub storage: MemoryStorage,
    pub state: AppState,
}

impl TestContext {
    /// Fresh context with an empty remote store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Context over an existing store.
    #[must_use]
    pub fn with_store(store: MemoryStore) -> Self {
        let storage = MemoryStorage::new();
        let shared: Arc<dyn LocalStorage> = Arc::new(storage.clone());
        let state = AppState::with_backend(config(), catalog(), store.clone(), shared);
        Self {
            store,
            storage,
            state,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
