//! Bundled static product catalog.
//!
//! The catalog ships inside the binary (`catalog/products.json`) and is the
//! fallback whenever the remote store is unreachable or has no matching rows.
//! It is split into four collections whose concatenation, in the order
//! featured, uphaar, kyddoz, festive, forms the catalog union.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use uphaar_core::{Brand, Product, ProductId};

/// Bundled catalog source.
const BUNDLED_CATALOG: &str = include_str!("../../catalog/products.json");

/// Errors that can occur when loading the static catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog JSON is malformed.
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The same product id appears more than once in the union.
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// Named collection within the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Featured,
    Uphaar,
    Kyddoz,
    Festive,
}

impl Collection {
    /// All collections in union order.
    pub const ALL: [Self; 4] = [Self::Featured, Self::Uphaar, Self::Kyddoz, Self::Festive];

    /// Lowercase collection name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Uphaar => "uphaar",
            Self::Kyddoz => "kyddoz",
            Self::Festive => "festive",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    featured: Vec<Product>,
    #[serde(default)]
    uphaar: Vec<Product>,
    #[serde(default)]
    kyddoz: Vec<Product>,
    #[serde(default)]
    festive: Vec<Product>,
}

/// The bundled product catalog.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    featured: Vec<Product>,
    uphaar: Vec<Product>,
    kyddoz: Vec<Product>,
    festive: Vec<Product>,
}

impl StaticCatalog {
    /// Load the catalog embedded at compile time.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled JSON is invalid or contains
    /// duplicate ids.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::DuplicateId` if an id occurs twice across collections.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let catalog = Self {
            featured: file.featured,
            uphaar: file.uphaar,
            kyddoz: file.kyddoz,
            festive: file.festive,
        };

        let mut seen = HashSet::new();
        for product in catalog.all() {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(catalog)
    }

    /// Products of one collection.
    #[must_use]
    pub fn collection(&self, collection: Collection) -> &[Product] {
        match collection {
            Collection::Featured => &self.featured,
            Collection::Uphaar => &self.uphaar,
            Collection::Kyddoz => &self.kyddoz,
            Collection::Festive => &self.festive,
        }
    }

    /// Every product in union order.
    pub fn all(&self) -> impl Iterator<Item = &Product> {
        Collection::ALL
            .into_iter()
            .flat_map(|collection| self.collection(collection))
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.all().find(|product| product.id == *id)
    }

    /// Products whose id is in `ids`, in union order.
    #[must_use]
    pub fn by_ids(&self, ids: &[ProductId]) -> Vec<Product> {
        self.all()
            .filter(|product| ids.contains(&product.id))
            .cloned()
            .collect()
    }

    /// Products of a brand across the whole union, in union order.
    #[must_use]
    pub fn by_brand(&self, brand: Brand) -> Vec<Product> {
        self.all()
            .filter(|product| product.brand == brand)
            .cloned()
            .collect()
    }

    /// Same-brand products other than `product`, at most `limit`.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<Product> {
        self.all()
            .filter(|p| p.brand == product.brand && p.id != product.id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Total number of products in the union.
    #[must_use]
    pub fn len(&self) -> usize {
        Collection::ALL
            .into_iter()
            .map(|collection| self.collection(collection).len())
            .sum()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
