//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! uphaar catalog list
//! uphaar catalog list --brand kyddoz
//! uphaar catalog featured
//! uphaar catalog show ky-01
//! ```

use std::io::Write;

use uphaar_core::{Brand, FieldKind, Product};
use uphaar_storefront::services::messaging::enquiry_link;
use uphaar_storefront::services::resolver::{DEFAULT_RELATED_LIMIT, FallbackPolicy, Resolved};
use uphaar_storefront::state::AppState;

use super::{CliError, display_price, find_product, stdout};

/// List products for a brand, or the whole catalog.
pub async fn list(state: &AppState, brand: Option<Brand>) -> Result<(), CliError> {
    let resolver = state.resolver();
    let products = match brand {
        Some(brand) => {
            resolver
                .products_by_brand(brand, FallbackPolicy::AcceptEmpty)
                .await
        }
        None => resolver.all_products(FallbackPolicy::AcceptEmpty).await,
    };
    print_products(&products)
}

/// List featured products.
pub async fn featured(state: &AppState) -> Result<(), CliError> {
    let products = state.resolver().featured().await;
    print_products(&products)
}

/// Show one product.
pub async fn show(state: &AppState, id: &str) -> Result<(), CliError> {
    let product = find_product(state, id).await?;
    let mut out = stdout();

    writeln!(out, "{} [{}]", product.name, product.id)?;
    writeln!(out, "{} · {}", display_price(product.price), product.brand)?;
    if let Some(badge) = &product.badge {
        writeln!(out, "Badge: {badge}")?;
    }
    if let Some(description) = &product.description {
        writeln!(out)?;
        for line in description.lines() {
            writeln!(out, "{line}")?;
        }
    }
    if !product.features.is_empty() {
        writeln!(out, "\nFeatures:")?;
        for feature in &product.features {
            writeln!(out, "- {feature}")?;
        }
    }
    if !product.sizes.is_empty() {
        let sizes: Vec<String> = product.sizes.iter().map(ToString::to_string).collect();
        writeln!(out, "\nSizes: {}", sizes.join(", "))?;
    }
    if product.is_customizable() {
        writeln!(out, "\nCustomization (pass with -o key=value):")?;
        for field in &product.customization_form {
            let marker = if field.required { " *" } else { "" };
            match field.kind {
                FieldKind::Select => writeln!(
                    out,
                    "  {}{marker}: {} [{}]",
                    field.name,
                    field.label,
                    field.options.join(" | ")
                )?,
                FieldKind::Text => writeln!(out, "  {}{marker}: {}", field.name, field.label)?,
            }
        }
    }

    let related = state.resolver().related(&product, DEFAULT_RELATED_LIMIT);
    if !related.is_empty() {
        writeln!(out, "\nYou may also like:")?;
        for item in &related {
            writeln!(out, "  {:<10} {}", item.id.as_str(), item.name)?;
        }
    }

    writeln!(
        out,
        "\nEnquire: {}",
        enquiry_link(&state.config().contacts, &product, None)
    )?;
    Ok(())
}

fn print_products(products: &Resolved<Vec<Product>>) -> Result<(), CliError> {
    let mut out = stdout();
    if products.value.is_empty() {
        writeln!(out, "No products found")?;
        return Ok(());
    }

    for product in &products.value {
        let badge = product
            .badge
            .as_deref()
            .map(|badge| format!("  [{badge}]"))
            .unwrap_or_default();
        writeln!(
            out,
            "{:<10} {:<48} {}{badge}",
            product.id.as_str(),
            product.name,
            display_price(product.price)
        )?;
    }

    if products.used_static() {
        tracing::debug!(source = ?products.source, "Listing served from the bundled catalog");
    }
    Ok(())
}
