//! In-process store for tests and local demos.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use uphaar_core::{
    Brand, NewOrder, OrderId, OrderRecord, OrderStatus, Product, ProductId, UserId,
};

use super::{OrderStore, ProductStore, Profile, ProfileStore, StoreError};

/// Rows held in memory. Clones share the same rows.
///
/// Products are kept newest first in the order they were added. Calling
/// [`MemoryStore::set_failing`] makes every call fail with
/// `StoreError::Unavailable`, which is how tests simulate a network error.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    rows: Mutex<Rows>,
    failing: AtomicBool,
    insert_attempts: AtomicUsize,
    insert_delay: Mutex<Option<Duration>>,
}

#[derive(Debug, Default)]
struct Rows {
    products: Vec<Product>,
    featured: HashSet<ProductId>,
    orders: Vec<OrderRecord>,
    profiles: HashMap<UserId, Profile>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Rows> {
        self.inner.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store set to fail".to_string()))
        } else {
            Ok(())
        }
    }

    /// Add a product row. Later rows count as newer.
    pub fn add_product(&self, product: Product) {
        self.rows().products.insert(0, product);
    }

    /// Add a product row flagged as featured.
    pub fn add_featured_product(&self, product: Product) {
        let mut rows = self.rows();
        rows.featured.insert(product.id.clone());
        rows.products.insert(0, product);
    }

    /// Add or replace a profile row.
    pub fn add_profile(&self, profile: Profile) {
        self.rows().profiles.insert(profile.id.clone(), profile);
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay order inserts by `delay` before they complete.
    pub fn set_insert_delay(&self, delay: Option<Duration>) {
        *self
            .inner
            .insert_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Number of `insert_order` calls made, successful or not.
    #[must_use]
    pub fn insert_attempts(&self) -> usize {
        self.inner.insert_attempts.load(Ordering::SeqCst)
    }

    /// Snapshot of stored orders in insertion order.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.rows().orders.clone()
    }
}

fn newest_first(mut orders: Vec<OrderRecord>) -> Vec<OrderRecord> {
    // Later inserts win ties on equal timestamps
    orders.reverse();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        Ok(self
            .rows()
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.check()?;
        Ok(self.rows().products.iter().find(|p| p.id == *id).cloned())
    }

    async fn products_by_brand(&self, brand: Brand) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        Ok(self
            .rows()
            .products
            .iter()
            .filter(|p| p.brand == brand)
            .cloned()
            .collect())
    }

    async fn featured_products(&self) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        let rows = self.rows();
        Ok(rows
            .products
            .iter()
            .filter(|p| rows.featured.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn all_products(&self) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        Ok(self.rows().products.clone())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<OrderRecord, StoreError> {
        self.inner.insert_attempts.fetch_add(1, Ordering::SeqCst);

        let delay = *self
            .inner
            .insert_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.check()?;
        let now = Utc::now();
        let record = OrderRecord {
            id: OrderId::new(uuid::Uuid::new_v4().to_string()),
            user_id: order.user_id.clone(),
            items: order.items.clone(),
            total: order.total,
            customer_details: order.customer_details.clone(),
            status: order.status.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.rows().orders.push(record.clone());
        Ok(record)
    }

    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<OrderRecord>, StoreError> {
        self.check()?;
        let orders = self
            .rows()
            .orders
            .iter()
            .filter(|o| o.user_id == *user)
            .cloned()
            .collect();
        Ok(newest_first(orders))
    }

    async fn all_orders(&self) -> Result<Vec<OrderRecord>, StoreError> {
        self.check()?;
        Ok(newest_first(self.rows().orders.clone()))
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<OrderRecord, StoreError> {
        self.check()?;
        let mut rows = self.rows();
        let order = rows
            .orders
            .iter_mut()
            .find(|o| o.id == *id)
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;
        order.status = status.clone();
        order.updated_at = Some(Utc::now());
        Ok(order.clone())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile(&self, user: &UserId) -> Result<Option<Profile>, StoreError> {
        self.check()?;
        Ok(self.rows().profiles.get(user).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uphaar_core::{CustomerDetails, Price};

    fn product(id: &str, brand: Brand) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            price: Price::new(100),
            brand,
            images: vec![],
            badge: None,
            description: None,
            features: vec![],
            sizes: vec![],
            customization_form: vec![],
            aspect_ratio: None,
        }
    }

    fn new_order(user: &str) -> NewOrder {
        NewOrder {
            user_id: UserId::new(user),
            items: vec![],
            total: Price::ZERO,
            customer_details: CustomerDetails::new("Asha", "9820000000").unwrap(),
            status: OrderStatus::placed(),
        }
    }

    #[tokio::test]
    async fn test_products_newest_first() {
        let store = MemoryStore::new();
        store.add_product(product("a", Brand::Uphaar));
        store.add_featured_product(product("b", Brand::Kyddoz));

        let all = store.all_products().await.unwrap();
        assert_eq!(all.first().unwrap().id.as_str(), "b");

        let featured = store.featured_products().await.unwrap();
        assert_eq!(featured.len(), 1);

        let kyddoz = store.products_by_brand(Brand::Kyddoz).await.unwrap();
        assert_eq!(kyddoz.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::new();
        store.add_product(product("a", Brand::Uphaar));
        store.set_failing(true);

        assert!(matches!(
            store.products_by_ids(&[ProductId::new("a")]).await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_failing(false);
        assert_eq!(store.products_by_ids(&[ProductId::new("a")]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_and_update_order() {
        let store = MemoryStore::new();
        let record = store.insert_order(&new_order("u1")).await.unwrap();
        store.insert_order(&new_order("u2")).await.unwrap();
        assert_eq!(store.insert_attempts(), 2);

        let mine = store.orders_for_user(&UserId::new("u1")).await.unwrap();
        assert_eq!(mine.len(), 1);

        let updated = store
            .update_order_status(&record.id, &OrderStatus::new("shipped"))
            .await
            .unwrap();
        assert_eq!(updated.status.as_str(), "shipped");
        assert_eq!(store.all_orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_unknown_order() {
        let store = MemoryStore::new();
        let result = store
            .update_order_status(&OrderId::new("missing"), &OrderStatus::new("shipped"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_insert_still_counts_attempt() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(store.insert_order(&new_order("u1")).await.is_err());
        assert_eq!(store.insert_attempts(), 1);
        assert!(store.orders().is_empty());
    }
}
