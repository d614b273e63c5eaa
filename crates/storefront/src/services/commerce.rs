//! Cart and wishlist state.
//!
//! [`CommerceStore`] is built once at startup from a [`LocalStorage`] port
//! and passed to whatever needs it. Every mutation writes the affected
//! collection back to storage synchronously; write failures are logged and
//! otherwise ignored, so the in-memory state stays authoritative for the
//! session.
//!
//! # Stored format
//!
//! - `cart`: `[{"id": "up-01", "qty": 2, "options": {"size": "M"}}, ...]`
//! - `wishlist`: `["up-01", "ky-03", ...]`
//!
//! Line ids are not stored; they are reassigned in order on load.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use uphaar_core::{CartLine, CartLineId, CartOptions, ProductId};

use crate::error::add_breadcrumb;
use crate::storage::LocalStorage;

/// Storage key of the cart.
pub const CART_KEY: &str = "cart";

/// Storage key of the wishlist.
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors rejected by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Lines always hold at least one unit.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    id: ProductId,
    qty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<CartOptions>,
}

/// The shopper's cart and wishlist.
pub struct CommerceStore {
    storage: Arc<dyn LocalStorage>,
    cart: Vec<CartLine>,
    wishlist: Vec<ProductId>,
    next_line_id: u64,
}

impl std::fmt::Debug for CommerceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceStore")
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .finish_non_exhaustive()
    }
}

impl CommerceStore {
    /// Load the cart and wishlist from `storage`.
    ///
    /// A missing, unreadable or corrupt value yields an empty collection.
    #[instrument(skip(storage))]
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let stored_cart: Vec<StoredLine> = read_collection(storage.as_ref(), CART_KEY);
        let stored_wishlist: Vec<ProductId> = read_collection(storage.as_ref(), WISHLIST_KEY);

        let mut store = Self {
            storage,
            cart: Vec::with_capacity(stored_cart.len()),
            wishlist: Vec::with_capacity(stored_wishlist.len()),
            next_line_id: 1,
        };

        for line in stored_cart {
            if line.qty == 0 {
                warn!(product_id = %line.id, "Dropping stored cart line with zero quantity");
                continue;
            }
            let line_id = store.allocate_line_id();
            store.cart.push(CartLine {
                line_id,
                product_id: line.id,
                quantity: line.qty,
                options: line.options,
            });
        }

        for id in stored_wishlist {
            if !store.wishlist.contains(&id) {
                store.wishlist.push(id);
            }
        }

        debug!(
            cart_lines = store.cart.len(),
            wishlist = store.wishlist.len(),
            "Loaded commerce state"
        );
        store
    }

    fn allocate_line_id(&mut self) -> CartLineId {
        let id = CartLineId::new(self.next_line_id);
        self.next_line_id += 1;
        id
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Cart lines in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    /// Total units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add `quantity` units of a product.
    ///
    /// A line with the same product and the same serialized options absorbs
    /// the quantity; otherwise a new line is appended. Returns the id of the
    /// line that now holds the units.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ZeroQuantity` if `quantity` is 0.
    #[instrument(skip(self, product_id, options), fields(product_id = %product_id))]
    pub fn add_to_cart(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        options: Option<CartOptions>,
    ) -> Result<CartLineId, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let line_id = if let Some(line) = self
            .cart
            .iter_mut()
            .find(|line| line.matches(product_id, options.as_ref()))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            line.line_id
        } else {
            let line_id = self.allocate_line_id();
            self.cart.push(CartLine {
                line_id,
                product_id: product_id.clone(),
                quantity,
                options,
            });
            line_id
        };

        let quantity = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product_id.as_str()), ("quantity", quantity.as_str())]),
        );
        self.persist_cart();
        Ok(line_id)
    }

    /// Remove the line at `index`.
    ///
    /// The index is positional in the current ordering, so it must be read
    /// from [`CommerceStore::cart`] immediately before the call: every removal
    /// shifts the lines after it. Prefer [`CommerceStore::remove_line`].
    /// An out-of-range index is a no-op.
    pub fn remove_from_cart(&mut self, index: usize) -> Option<CartLine> {
        if index >= self.cart.len() {
            return None;
        }
        let removed = self.cart.remove(index);
        self.persist_cart();
        Some(removed)
    }

    /// Remove the line with `line_id`, if it is still in the cart.
    pub fn remove_line(&mut self, line_id: CartLineId) -> Option<CartLine> {
        let index = self.cart.iter().position(|line| line.line_id == line_id)?;
        let removed = self.cart.remove(index);
        self.persist_cart();
        Some(removed)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart();
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Wishlisted product ids in insertion order.
    #[must_use]
    pub fn wishlist(&self) -> &[ProductId] {
        &self.wishlist
    }

    /// Whether `product_id` is on the wishlist.
    #[must_use]
    pub fn is_wishlisted(&self, product_id: &ProductId) -> bool {
        self.wishlist.contains(product_id)
    }

    /// Flip wishlist membership. Returns `true` if the product is now on it.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn toggle_wishlist(&mut self, product_id: &ProductId) -> bool {
        let added = if let Some(index) = self.wishlist.iter().position(|id| id == product_id) {
            self.wishlist.remove(index);
            false
        } else {
            self.wishlist.push(product_id.clone());
            true
        };

        add_breadcrumb(
            "wishlist",
            if added { "Added to wishlist" } else { "Removed from wishlist" },
            Some(&[("product_id", product_id.as_str())]),
        );
        self.persist_wishlist();
        added
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_cart(&self) {
        let stored: Vec<StoredLine> = self
            .cart
            .iter()
            .map(|line| StoredLine {
                id: line.product_id.clone(),
                qty: line.quantity,
                options: line.options.clone(),
            })
            .collect();
        write_collection(self.storage.as_ref(), CART_KEY, &stored);
    }

    fn persist_wishlist(&self) {
        write_collection(self.storage.as_ref(), WISHLIST_KEY, &self.wishlist);
    }
}

fn read_collection<T: serde::de::DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Vec<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored collection, starting empty");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "Discarding corrupt stored collection");
        Vec::new()
    })
}

fn write_collection<T: Serialize>(storage: &dyn LocalStorage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(crate::storage::StorageError::from)
        .and_then(|json| storage.set(key, &json));
    if let Err(e) = result {
        warn!(key, error = %e, "Failed to persist collection");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn opts(pairs: &[(&str, &str)]) -> CartOptions {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn store() -> (CommerceStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (CommerceStore::load(Arc::new(storage.clone())), storage)
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl LocalStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        fn clear(&self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_identical_adds_merge() {
        let (mut store, _) = store();
        let id = ProductId::new("up-01");
        let first = store.add_to_cart(&id, 1, Some(opts(&[("size", "M")]))).unwrap();
        let second = store.add_to_cart(&id, 3, Some(opts(&[("size", "M")]))).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, 4);
        assert_eq!(store.cart_count(), 4);
    }

    #[test]
    fn test_different_options_make_distinct_lines() {
        let (mut store, _) = store();
        let id = ProductId::new("up-01");
        store.add_to_cart(&id, 1, Some(opts(&[("size", "M")]))).unwrap();
        store.add_to_cart(&id, 1, Some(opts(&[("size", "L")]))).unwrap();
        store.add_to_cart(&id, 1, None).unwrap();
        // Same pairs in a different order serialize differently
        store
            .add_to_cart(&id, 1, Some(opts(&[("color", "Red"), ("size", "M")])))
            .unwrap();
        store
            .add_to_cart(&id, 1, Some(opts(&[("size", "M"), ("color", "Red")])))
            .unwrap();

        assert_eq!(store.cart().len(), 5);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (mut store, storage) = store();
        assert_eq!(
            store.add_to_cart(&ProductId::new("up-01"), 0, None),
            Err(CartError::ZeroQuantity)
        );
        assert!(store.cart().is_empty());
        assert!(storage.get(CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_add_persists_stored_format() {
        let (mut store, storage) = store();
        store
            .add_to_cart(&ProductId::new("up-01"), 2, Some(opts(&[("size", "M")])))
            .unwrap();
        store.add_to_cart(&ProductId::new("up-10"), 1, None).unwrap();

        let raw = storage.get(CART_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":"up-01","qty":2,"options":{"size":"M"}},{"id":"up-10","qty":1}]"#
        );
    }

    #[test]
    fn test_toggle_wishlist_round_trip() {
        let (mut store, storage) = store();
        let id = ProductId::new("ky-03");

        assert!(store.toggle_wishlist(&id));
        assert!(store.is_wishlisted(&id));
        assert_eq!(storage.get(WISHLIST_KEY).unwrap().as_deref(), Some(r#"["ky-03"]"#));

        assert!(!store.toggle_wishlist(&id));
        assert!(store.wishlist().is_empty());
        assert_eq!(storage.get(WISHLIST_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_remove_from_cart_out_of_range_is_noop() {
        let (mut store, _) = store();
        store.add_to_cart(&ProductId::new("up-01"), 1, None).unwrap();
        assert!(store.remove_from_cart(5).is_none());
        assert_eq!(store.cart().len(), 1);
    }

    #[test]
    fn test_remove_line_by_id() {
        let (mut store, _) = store();
        let a = store.add_to_cart(&ProductId::new("a"), 1, None).unwrap();
        let b = store.add_to_cart(&ProductId::new("b"), 1, None).unwrap();

        assert_eq!(store.remove_line(a).unwrap().product_id.as_str(), "a");
        assert!(store.remove_line(a).is_none());
        assert_eq!(store.cart()[0].line_id, b);
    }

    #[test]
    fn test_clear_cart_persists_empty() {
        let (mut store, storage) = store();
        store.add_to_cart(&ProductId::new("a"), 1, None).unwrap();
        store.clear_cart();
        assert_eq!(store.cart_count(), 0);
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_corrupt_data_starts_empty() {
        let storage = MemoryStorage::with_values([(CART_KEY, "{not json"), (WISHLIST_KEY, "42")]);
        let store = CommerceStore::load(Arc::new(storage));
        assert!(store.cart().is_empty());
        assert!(store.wishlist().is_empty());
    }

    #[test]
    fn test_load_drops_zero_quantity_and_duplicate_wishlist() {
        let storage = MemoryStorage::with_values([
            (CART_KEY, r#"[{"id":"a","qty":0},{"id":"b","qty":2}]"#),
            (WISHLIST_KEY, r#"["x","y","x"]"#),
        ]);
        let store = CommerceStore::load(Arc::new(storage));
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].product_id.as_str(), "b");
        assert_eq!(store.wishlist().len(), 2);
    }

    #[test]
    fn test_reload_assigns_fresh_line_ids() {
        let (mut store, storage) = store();
        store.add_to_cart(&ProductId::new("a"), 1, None).unwrap();
        store.add_to_cart(&ProductId::new("b"), 1, None).unwrap();

        let mut reloaded = CommerceStore::load(Arc::new(storage));
        let ids: Vec<_> = reloaded.cart().iter().map(|l| l.line_id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2]);

        let next = reloaded.add_to_cart(&ProductId::new("c"), 1, None).unwrap();
        assert_eq!(next.as_u64(), 3);
    }

    #[test]
    fn test_write_failures_are_ignored() {
        let mut store = CommerceStore::load(Arc::new(ReadOnlyStorage));
        store.add_to_cart(&ProductId::new("a"), 1, None).unwrap();
        assert!(store.toggle_wishlist(&ProductId::new("a")));
        assert_eq!(store.cart().len(), 1);
    }
}
