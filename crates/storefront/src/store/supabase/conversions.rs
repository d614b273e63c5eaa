//! Row type conversion functions for the `products` table.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use uphaar_core::{Brand, Description, Price, Product, ProductId};

/// A row of the `products` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    /// `numeric` column; may arrive as `550` or `550.0`.
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Brand>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub availability: Option<bool>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub limited: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

impl ProductRow {
    fn badge(&self) -> Option<String> {
        if self.featured.unwrap_or(false) {
            Some("Featured".to_string())
        } else if self.limited.unwrap_or(false) {
            Some("Limited".to_string())
        } else {
            None
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let badge = row.badge();
        Self {
            price: Price::from_decimal(row.price),
            brand: row.category.unwrap_or_default(),
            images: row.images.unwrap_or_default(),
            badge,
            description: row
                .description
                .filter(|text| !text.trim().is_empty())
                .map(Description::Text),
            features: Vec::new(),
            sizes: Vec::new(),
            customization_form: Vec::new(),
            aspect_ratio: row.aspect_ratio,
            id: row.id,
            name: row.name,
        }
    }
}

/// Convert a list of rows.
pub fn convert_products(rows: Vec<ProductRow>) -> Vec<Product> {
    rows.into_iter().map(Product::from).collect()
}
