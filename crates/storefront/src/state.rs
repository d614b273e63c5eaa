//! Application state shared across commands.

use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::StaticCatalog;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::commerce::CommerceStore;
use crate::services::orders::{OrderHistory, OrderSubmitter};
use crate::services::resolver::CatalogResolver;
use crate::storage::{FileStorage, LocalStorage};
use crate::store::{OfflineStore, OrderStore, ProductStore, ProfileStore, SupabaseClient};

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the remote store and local storage.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    resolver: CatalogResolver,
    submitter: OrderSubmitter,
    history: OrderHistory,
    profiles: Arc<dyn ProfileStore>,
    storage: Arc<dyn LocalStorage>,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Uses Supabase when it is configured and the bundled catalog alone
    /// otherwise. Cart and wishlist live under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled catalog is invalid or the Supabase
    /// client cannot be built.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, AppError> {
        let catalog = Arc::new(StaticCatalog::bundled()?);
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(config.data_dir.clone()));

        if let Some(supabase) = &config.supabase {
            let client = SupabaseClient::new(supabase)?;
            info!(url = %supabase.url, "Using Supabase store");
            Ok(Self::with_backend(config, catalog, client, storage))
        } else {
            warn!("SUPABASE_URL not set, serving the bundled catalog only");
            Ok(Self::with_backend(config, catalog, OfflineStore, storage))
        }
    }

    /// Create application state over an explicit backend and storage.
    #[must_use]
    pub fn with_backend<S>(
        config: StorefrontConfig,
        catalog: Arc<StaticCatalog>,
        backend: S,
        storage: Arc<dyn LocalStorage>,
    ) -> Self
    where
        S: ProductStore + OrderStore + ProfileStore + 'static,
    {
        let backend = Arc::new(backend);
        let products: Arc<dyn ProductStore> = backend.clone();
        let orders: Arc<dyn OrderStore> = backend.clone();
        let profiles: Arc<dyn ProfileStore> = backend;

        let resolver = CatalogResolver::new(products, catalog);
        let submitter = OrderSubmitter::new(Arc::clone(&orders), config.contacts.clone());
        let history = OrderHistory::new(orders, Arc::clone(&profiles));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                resolver,
                submitter,
                history,
                profiles,
                storage,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the bundled catalog.
    #[must_use]
    pub fn catalog(&self) -> &StaticCatalog {
        self.inner.resolver.catalog()
    }

    /// Get a reference to the product resolver.
    #[must_use]
    pub fn resolver(&self) -> &CatalogResolver {
        &self.inner.resolver
    }

    /// Get a reference to the order submitter.
    #[must_use]
    pub fn submitter(&self) -> &OrderSubmitter {
        &self.inner.submitter
    }

    /// Get a reference to the order history.
    #[must_use]
    pub fn history(&self) -> &OrderHistory {
        &self.inner.history
    }

    /// Get a reference to the profile store.
    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileStore {
        self.inner.profiles.as_ref()
    }

    /// Load the cart and wishlist from local storage.
    #[must_use]
    pub fn load_commerce(&self) -> CommerceStore {
        CommerceStore::load(Arc::clone(&self.inner.storage))
    }
}
