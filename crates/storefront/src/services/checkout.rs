//! Checkout aggregation.
//!
//! Joins cart lines to product data, prices them and validates what the
//! shopper typed in before an order can be placed.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{instrument, warn};

use uphaar_core::{
    Brand, CartLine, CartLineId, CartOptions, ContactError, OrderItem, Price, Product, ProductId,
    UserId,
};

use super::resolver::{CatalogResolver, FallbackPolicy, Source};
use crate::store::ProfileStore;

/// Display name of a cart line whose product could not be resolved.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Validation failures that block checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Name or phone missing.
    #[error(transparent)]
    Contact(#[from] ContactError),

    /// Required customization fields left blank, by label.
    #[error("Please fill in: {}", .0.join(", "))]
    MissingCustomization(Vec<String>),

    /// The shopper must sign in first.
    #[error("Please sign in to continue")]
    AuthRequired,
}

/// A cart line joined to its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    pub line_id: CartLineId,
    pub product_id: ProductId,
    /// `None` when neither the remote store nor the static catalog knows the id.
    pub product: Option<Product>,
    pub quantity: u32,
    pub options: Option<CartOptions>,
}

impl ResolvedLine {
    /// Product name, or a placeholder for unresolved lines.
    #[must_use]
    pub fn name(&self) -> &str {
        self.product
            .as_ref()
            .map_or(UNKNOWN_PRODUCT_NAME, |product| product.name.as_str())
    }

    /// Unit price; zero for unresolved lines.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.product
            .as_ref()
            .map_or(Price::ZERO, |product| product.price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }

    /// Brand of the resolved product.
    #[must_use]
    pub fn brand(&self) -> Option<Brand> {
        self.product.as_ref().map(|product| product.brand)
    }

    /// Option entries with a non-empty value, in insertion order.
    pub fn filled_options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .flat_map(|opts| opts.iter())
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Snapshot for the order record.
    #[must_use]
    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            product_id: self.product_id.clone(),
            name: self.name().to_string(),
            price: self.unit_price(),
            quantity: self.quantity,
            options: self.options.clone(),
        }
    }
}

/// Priced cart ready for rendering and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub lines: Vec<ResolvedLine>,
    pub subtotal: Price,
    /// Equal to `subtotal`; shipping is arranged separately.
    pub total: Price,
    pub source: Source,
}

impl CheckoutSummary {
    /// Whether there is nothing to order.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any resolved line belongs to `brand`.
    #[must_use]
    pub fn contains_brand(&self, brand: Brand) -> bool {
        self.lines.iter().any(|line| line.brand() == Some(brand))
    }

    /// Order item snapshots in cart order.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines.iter().map(ResolvedLine::to_order_item).collect()
    }
}

/// Resolve and price the cart.
///
/// Ids the remote store does not return are looked up in the static
/// catalog; ids found in neither stay in the summary with no product and
/// contribute zero to the total.
#[instrument(skip(lines, resolver), fields(lines = lines.len()))]
pub async fn resolve_cart(lines: &[CartLine], resolver: &CatalogResolver) -> CheckoutSummary {
    let mut seen = HashSet::new();
    let ids: Vec<ProductId> = lines
        .iter()
        .filter(|line| seen.insert(&line.product_id))
        .map(|line| line.product_id.clone())
        .collect();

    let resolved = resolver
        .products_by_ids(&ids, FallbackPolicy::FillMissing)
        .await;

    let lines: Vec<ResolvedLine> = lines
        .iter()
        .map(|line| ResolvedLine {
            line_id: line.line_id,
            product_id: line.product_id.clone(),
            product: resolved
                .value
                .iter()
                .find(|product| product.id == line.product_id)
                .cloned(),
            quantity: line.quantity,
            options: line.options.clone(),
        })
        .collect();

    let unresolved = lines.iter().filter(|line| line.product.is_none()).count();
    if unresolved > 0 {
        warn!(unresolved, "Cart contains products that could not be resolved");
    }

    let subtotal: Price = lines.iter().map(ResolvedLine::line_total).sum();
    CheckoutSummary {
        lines,
        subtotal,
        total: subtotal,
        source: resolved.source,
    }
}

/// Name and phone to pre-fill the checkout form with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPrefill {
    pub name: String,
    pub phone: String,
}

/// Pre-fill the checkout form from the signed-in user's profile.
///
/// Missing profiles, missing fields and store errors all yield empty strings.
#[instrument(skip(profiles))]
pub async fn prefill_customer(profiles: &dyn ProfileStore, user: Option<&UserId>) -> CustomerPrefill {
    let Some(user) = user else {
        return CustomerPrefill::default();
    };

    match profiles.profile(user).await {
        Ok(Some(profile)) => CustomerPrefill {
            name: profile.name.unwrap_or_default(),
            phone: profile.phone.unwrap_or_default(),
        },
        Ok(None) => CustomerPrefill::default(),
        Err(e) => {
            warn!(error = %e, "Failed to load profile for checkout prefill");
            CustomerPrefill::default()
        }
    }
}

/// Check that every required customization field has a value.
///
/// # Errors
///
/// Returns `CheckoutError::MissingCustomization` listing the labels of the
/// blank required fields in form order.
pub fn validate_customization(
    product: &Product,
    options: Option<&CartOptions>,
) -> Result<(), CheckoutError> {
    let missing: Vec<String> = product
        .missing_required_fields(options)
        .into_iter()
        .map(|field| field.label.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::MissingCustomization(missing))
    }
}
