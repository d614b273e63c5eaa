//! Remote product, order and profile stores.
//!
//! # Architecture
//!
//! - Each concern is an async port (`ProductStore`, `OrderStore`,
//!   `ProfileStore`) so flows can run against any backend
//! - `SupabaseClient` talks to a Supabase project over PostgREST
//! - `OfflineStore` stands in when no project is configured; every call
//!   fails with `StoreError::NotConfigured` and callers fall back to the
//!   static catalog
//! - `MemoryStore` keeps rows in process for tests and demos
//!
//! No caching, retry or timeout: every call goes to the backend.

mod memory;
mod offline;
mod supabase;

pub use memory::MemoryStore;
pub use offline::OfflineStore;
pub use supabase::{ProductRow, SupabaseClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use uphaar_core::{
    Brand, NewOrder, OrderId, OrderRecord, OrderStatus, Product, ProductId, ProfileRole, UserId,
};

/// Errors that can occur when talking to a remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Row to update does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No remote store is configured.
    #[error("Remote store not configured")]
    NotConfigured,

    /// Backend is unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A user profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<ProfileRole>,
}

impl Profile {
    /// Whether this profile may manage all orders.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(ProfileRole::Admin)
    }
}

/// Read access to remote product rows.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products whose id is in `ids`. Unknown ids are simply absent.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// A single product by id.
    async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Products of one brand.
    async fn products_by_brand(&self, brand: Brand) -> Result<Vec<Product>, StoreError>;

    /// Products flagged as featured, newest first.
    async fn featured_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Every product, newest first.
    async fn all_products(&self) -> Result<Vec<Product>, StoreError>;
}

/// Read/write access to remote order rows.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order and return the stored row.
    async fn insert_order(&self, order: &NewOrder) -> Result<OrderRecord, StoreError>;

    /// Orders placed by `user`, newest first.
    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<OrderRecord>, StoreError>;

    /// All orders, newest first.
    async fn all_orders(&self) -> Result<Vec<OrderRecord>, StoreError>;

    /// Set the status of one order and return the updated row.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<OrderRecord, StoreError>;
}

/// Read access to user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The profile for `user`, if one exists.
    async fn profile(&self, user: &UserId) -> Result<Option<Profile>, StoreError>;
}
