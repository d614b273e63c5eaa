//! Stand-in store used when no remote project is configured.

use async_trait::async_trait;

use uphaar_core::{Brand, NewOrder, OrderId, OrderRecord, OrderStatus, Product, ProductId, UserId};

use super::{OrderStore, ProductStore, Profile, ProfileStore, StoreError};

/// Every call fails with [`StoreError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineStore;

#[async_trait]
impl ProductStore for OfflineStore {
    async fn products_by_ids(&self, _ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn product_by_id(&self, _id: &ProductId) -> Result<Option<Product>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn products_by_brand(&self, _brand: Brand) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn featured_products(&self) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn all_products(&self) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::NotConfigured)
    }
}

#[async_trait]
impl OrderStore for OfflineStore {
    async fn insert_order(&self, _order: &NewOrder) -> Result<OrderRecord, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn orders_for_user(&self, _user: &UserId) -> Result<Vec<OrderRecord>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn all_orders(&self) -> Result<Vec<OrderRecord>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn update_order_status(
        &self,
        _id: &OrderId,
        _status: &OrderStatus,
    ) -> Result<OrderRecord, StoreError> {
        Err(StoreError::NotConfigured)
    }
}

#[async_trait]
impl ProfileStore for OfflineStore {
    async fn profile(&self, _user: &UserId) -> Result<Option<Profile>, StoreError> {
        Err(StoreError::NotConfigured)
    }
}
