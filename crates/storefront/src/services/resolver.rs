//! Two-stage product resolution: remote store first, static catalog second.
//!
//! Every lookup queries the remote store. A remote error always falls back
//! to the static catalog. What a successful but empty (or partial) remote
//! answer means depends on the caller, so each call site passes a
//! [`FallbackPolicy`] and gets back a [`Resolved`] tagged with where the
//! data came from.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use uphaar_core::{Brand, Product, ProductId};

use crate::catalog::{Collection, StaticCatalog};
use crate::store::ProductStore;

/// Number of related products shown on a detail page.
pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Remote rows only.
    Remote,
    /// Static catalog only.
    Static,
    /// Remote rows combined with static products.
    Merged,
}

/// A value tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub source: Source,
    pub value: T,
}

impl<T> Resolved<T> {
    const fn remote(value: T) -> Self {
        Self {
            source: Source::Remote,
            value,
        }
    }

    const fn fallback(value: T) -> Self {
        Self {
            source: Source::Static,
            value,
        }
    }

    /// Whether any static data was used.
    #[must_use]
    pub fn used_static(&self) -> bool {
        self.source != Source::Remote
    }

    /// Discard the source tag.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// How a successful remote answer is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Remote success is final, even with zero rows (listing pages).
    AcceptEmpty,
    /// Zero remote rows fall back to the static catalog (detail pages).
    FallbackOnEmpty,
    /// Requested ids missing from the remote rows are looked up in the static
    /// catalog one by one (cart resolution). For lookups that are not by id
    /// this behaves like `FallbackOnEmpty`.
    FillMissing,
}

/// Resolves products against the remote store with static fallback.
#[derive(Clone)]
pub struct CatalogResolver {
    store: Arc<dyn ProductStore>,
    catalog: Arc<StaticCatalog>,
}

impl CatalogResolver {
    /// Create a resolver over a remote store and the static catalog.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>, catalog: Arc<StaticCatalog>) -> Self {
        Self { store, catalog }
    }

    /// The static catalog.
    #[must_use]
    pub fn catalog(&self) -> &StaticCatalog {
        &self.catalog
    }

    /// A single product for the detail page.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Resolved<Option<Product>> {
        match self.store.product_by_id(id).await {
            Ok(Some(product)) => Resolved::remote(Some(product)),
            Ok(None) => {
                debug!("Product not in remote store, using static catalog");
                Resolved::fallback(self.catalog.get(id).cloned())
            }
            Err(e) => {
                warn!(error = %e, "Remote product lookup failed, using static catalog");
                Resolved::fallback(self.catalog.get(id).cloned())
            }
        }
    }

    /// Products for a set of ids.
    #[instrument(skip(self, ids, policy), fields(count = ids.len(), ?policy))]
    pub async fn products_by_ids(
        &self,
        ids: &[ProductId],
        policy: FallbackPolicy,
    ) -> Resolved<Vec<Product>> {
        let rows = match self.store.products_by_ids(ids).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Remote id lookup failed, using static catalog");
                return Resolved::fallback(self.catalog.by_ids(ids));
            }
        };

        match policy {
            FallbackPolicy::AcceptEmpty => Resolved::remote(rows),
            FallbackPolicy::FallbackOnEmpty if rows.is_empty() => {
                debug!("No remote rows, using static catalog");
                Resolved::fallback(self.catalog.by_ids(ids))
            }
            FallbackPolicy::FallbackOnEmpty => Resolved::remote(rows),
            FallbackPolicy::FillMissing => self.fill_missing(ids, rows),
        }
    }

    fn fill_missing(&self, ids: &[ProductId], mut rows: Vec<Product>) -> Resolved<Vec<Product>> {
        let remote_count = rows.len();
        for id in ids {
            if rows.iter().any(|p| p.id == *id) {
                continue;
            }
            if let Some(product) = self.catalog.get(id) {
                rows.push(product.clone());
            }
        }

        let filled = rows.len() - remote_count;
        let source = match (remote_count, filled) {
            (_, 0) => Source::Remote,
            (0, _) => Source::Static,
            _ => Source::Merged,
        };
        if filled > 0 {
            debug!(remote = remote_count, filled, "Filled missing products from static catalog");
        }
        Resolved {
            source,
            value: rows,
        }
    }

    /// Products of one brand for a listing page.
    #[instrument(skip(self, brand), fields(brand = %brand))]
    pub async fn products_by_brand(
        &self,
        brand: Brand,
        policy: FallbackPolicy,
    ) -> Resolved<Vec<Product>> {
        match self.store.products_by_brand(brand).await {
            Ok(rows) if rows.is_empty() && policy != FallbackPolicy::AcceptEmpty => {
                Resolved::fallback(self.catalog.by_brand(brand))
            }
            Ok(rows) => Resolved::remote(rows),
            Err(e) => {
                warn!(error = %e, "Remote brand listing failed, using static catalog");
                Resolved::fallback(self.catalog.by_brand(brand))
            }
        }
    }

    /// Every product, newest first when remote.
    #[instrument(skip(self))]
    pub async fn all_products(&self, policy: FallbackPolicy) -> Resolved<Vec<Product>> {
        match self.store.all_products().await {
            Ok(rows) if rows.is_empty() && policy != FallbackPolicy::AcceptEmpty => {
                Resolved::fallback(self.catalog.all().cloned().collect())
            }
            Ok(rows) => Resolved::remote(rows),
            Err(e) => {
                warn!(error = %e, "Remote listing failed, using static catalog");
                Resolved::fallback(self.catalog.all().cloned().collect())
            }
        }
    }

    /// Home page featured products.
    ///
    /// Starts from the static featured collection and merges in remote
    /// featured rows (newest first). A remote row whose id is already present
    /// replaces the static product in place; new ids are appended.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Resolved<Vec<Product>> {
        let mut products = self.catalog.collection(Collection::Featured).to_vec();

        let rows = match self.store.featured_products().await {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => return Resolved::fallback(products),
            Err(e) => {
                warn!(error = %e, "Remote featured lookup failed, using static catalog");
                return Resolved::fallback(products);
            }
        };

        for row in rows {
            if let Some(existing) = products.iter_mut().find(|p| p.id == row.id) {
                *existing = row;
            } else {
                products.push(row);
            }
        }

        Resolved {
            source: Source::Merged,
            value: products,
        }
    }

    /// Wishlist products. An empty wishlist never queries the store.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn wishlist(&self, ids: &[ProductId]) -> Resolved<Vec<Product>> {
        if ids.is_empty() {
            return Resolved::fallback(Vec::new());
        }
        self.products_by_ids(ids, FallbackPolicy::AcceptEmpty).await
    }

    /// Same-brand static products other than `product`.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<Product> {
        self.catalog.related(product, limit)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, OfflineStore};
    use uphaar_core::Price;

    fn catalog() -> Arc<StaticCatalog> {
        Arc::new(StaticCatalog::bundled().unwrap())
    }

    fn remote_product(id: &str, price: u64, brand: Brand) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Remote {id}"),
            price: Price::new(price),
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

    fn ids(values: &[&str]) -> Vec<ProductId> {
        values.iter().map(|v| ProductId::new(*v)).collect()
    }

    #[tokio::test]
    async fn test_product_prefers_remote() {
        let store = MemoryStore::new();
        store.add_product(remote_product("up-01", 600, Brand::Uphaar));
        let resolver = CatalogResolver::new(Arc::new(store), catalog());

        let resolved = resolver.product(&ProductId::new("up-01")).await;
        assert_eq!(resolved.source, Source::Remote);
        assert_eq!(resolved.value.unwrap().price, Price::new(600));
    }

    #[tokio::test]
    async fn test_product_falls_back_when_absent() {
        let resolver = CatalogResolver::new(Arc::new(MemoryStore::new()), catalog());

        let resolved = resolver.product(&ProductId::new("up-01")).await;
        assert_eq!(resolved.source, Source::Static);
        assert_eq!(resolved.value.unwrap().price, Price::new(550));

        let missing = resolver.product(&ProductId::new("nope")).await;
        assert!(missing.value.is_none());
    }

    #[tokio::test]
    async fn test_remote_error_falls_back() {
        let resolver = CatalogResolver::new(Arc::new(OfflineStore), catalog());
        let resolved = resolver
            .products_by_ids(&ids(&["up-01", "ky-01"]), FallbackPolicy::AcceptEmpty)
            .await;
        assert_eq!(resolved.source, Source::Static);
        assert_eq!(resolved.value.len(), 2);
    }

    #[tokio::test]
    async fn test_accept_empty_keeps_empty_result() {
        let resolver = CatalogResolver::new(Arc::new(MemoryStore::new()), catalog());
        let resolved = resolver
            .products_by_ids(&ids(&["up-01"]), FallbackPolicy::AcceptEmpty)
            .await;
        assert_eq!(resolved.source, Source::Remote);
        assert!(resolved.value.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_on_empty() {
        let resolver = CatalogResolver::new(Arc::new(MemoryStore::new()), catalog());
        let resolved = resolver
            .products_by_ids(&ids(&["up-01"]), FallbackPolicy::FallbackOnEmpty)
            .await;
        assert_eq!(resolved.source, Source::Static);
        assert_eq!(resolved.value.len(), 1);
    }

    #[tokio::test]
    async fn test_fill_missing_merges() {
        let store = MemoryStore::new();
        store.add_product(remote_product("db-01", 999, Brand::Festive));
        let resolver = CatalogResolver::new(Arc::new(store), catalog());

        let resolved = resolver
            .products_by_ids(&ids(&["db-01", "up-01", "ghost"]), FallbackPolicy::FillMissing)
            .await;
        assert_eq!(resolved.source, Source::Merged);
        let found: Vec<_> = resolved.value.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(found, vec!["db-01", "up-01"]);
    }

    #[tokio::test]
    async fn test_fill_missing_without_remote_rows_is_static() {
        let resolver = CatalogResolver::new(Arc::new(MemoryStore::new()), catalog());
        let resolved = resolver
            .products_by_ids(&ids(&["up-01"]), FallbackPolicy::FillMissing)
            .await;
        assert_eq!(resolved.source, Source::Static);
    }

    #[tokio::test]
    async fn test_brand_listing_accepts_empty() {
        let resolver = CatalogResolver::new(Arc::new(MemoryStore::new()), catalog());
        let listing = resolver
            .products_by_brand(Brand::Kyddoz, FallbackPolicy::AcceptEmpty)
            .await;
        assert_eq!(listing.source, Source::Remote);
        assert!(listing.value.is_empty());

        let offline = CatalogResolver::new(Arc::new(OfflineStore), catalog());
        let listing = offline
            .products_by_brand(Brand::Kyddoz, FallbackPolicy::AcceptEmpty)
            .await;
        assert_eq!(listing.source, Source::Static);
        assert_eq!(listing.value.len(), 15);
    }

    #[tokio::test]
    async fn test_featured_merges_and_dedupes() {
        let store = MemoryStore::new();
        store.add_featured_product(remote_product("fp-02", 1500, Brand::Uphaar));
        store.add_featured_product(remote_product("db-new", 700, Brand::Kyddoz));
        let resolver = CatalogResolver::new(Arc::new(store), catalog());

        let featured = resolver.featured().await;
        assert_eq!(featured.source, Source::Merged);
        assert_eq!(featured.value.len(), 11);
        // Replaced in place, keeping the static position
        assert_eq!(featured.value[1].id.as_str(), "fp-02");
        assert_eq!(featured.value[1].price, Price::new(1500));
        assert_eq!(featured.value.last().unwrap().id.as_str(), "db-new");
    }

    #[tokio::test]
    async fn test_featured_without_remote_rows() {
        let resolver = CatalogResolver::new(Arc::new(MemoryStore::new()), catalog());
        let featured = resolver.featured().await;
        assert_eq!(featured.source, Source::Static);
        assert_eq!(featured.value.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_wishlist_skips_store() {
        let resolver = CatalogResolver::new(Arc::new(OfflineStore), catalog());
        let resolved = resolver.wishlist(&[]).await;
        assert!(resolved.value.is_empty());
    }

    #[test]
    fn test_related_limit() {
        let resolver = CatalogResolver::new(Arc::new(OfflineStore), catalog());
        let product = resolver.catalog().get(&ProductId::new("fpick-01")).unwrap().clone();
        let related = resolver.related(&product, DEFAULT_RELATED_LIMIT);
        assert_eq!(related.len(), 2);
    }
}
