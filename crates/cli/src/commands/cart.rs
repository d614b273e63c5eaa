//! Cart and wishlist commands.
//!
//! # Usage
//!
//! ```bash
//! uphaar cart add ky-01 -o size="Hand Towel (16×24\")" -o customName=Aarav
//! uphaar cart show
//! uphaar cart remove 1
//! uphaar cart remove-line 3
//! uphaar wishlist toggle up-10
//! ```

use std::io::Write;

use uphaar_core::{CartLineId, CurrencyCode, ProductId};
use uphaar_storefront::services::checkout::{resolve_cart, validate_customization};
use uphaar_storefront::state::AppState;

use super::{CliError, cart_options, display_price, find_product, stdout};

/// Add a product, validating its required customization fields first.
pub async fn add(
    state: &AppState,
    id: &str,
    quantity: u32,
    options: Vec<(String, String)>,
) -> Result<(), CliError> {
    let product = find_product(state, id).await?;
    let options = cart_options(options);
    validate_customization(&product, options.as_ref())?;

    let mut commerce = state.load_commerce();
    let line_id = commerce.add_to_cart(&product.id, quantity, options)?;

    writeln!(
        stdout(),
        "Added {} x {quantity} (line {line_id}). Cart has {} item(s).",
        product.name,
        commerce.cart_count()
    )?;
    Ok(())
}

/// Print the priced cart.
pub async fn show(state: &AppState) -> Result<(), CliError> {
    let commerce = state.load_commerce();
    let mut out = stdout();
    if commerce.cart().is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    let summary = resolve_cart(commerce.cart(), state.resolver()).await;
    for (position, line) in summary.lines.iter().enumerate() {
        writeln!(
            out,
            "{}. [line {}] {} x {} – {}",
            position + 1,
            line.line_id,
            line.name(),
            line.quantity,
            line.line_total().plain(CurrencyCode::INR)
        )?;
        for (key, value) in line.filled_options() {
            writeln!(out, "     {key}: {value}")?;
        }
    }
    writeln!(out, "\nSubtotal: {}", summary.subtotal.grouped(CurrencyCode::INR))?;
    writeln!(out, "Shipping is arranged on WhatsApp")?;
    Ok(())
}

/// Remove the line at a 1-based position.
pub fn remove(state: &AppState, position: usize) -> Result<(), CliError> {
    let index = position
        .checked_sub(1)
        .ok_or_else(|| CliError::Usage("Positions start at 1".to_string()))?;

    let mut commerce = state.load_commerce();
    match commerce.remove_from_cart(index) {
        Some(line) => writeln!(stdout(), "Removed {} (line {})", line.product_id, line.line_id)?,
        None => writeln!(stdout(), "No cart line at position {position}")?,
    }
    Ok(())
}

/// Remove a line by its stable line id.
pub fn remove_line(state: &AppState, line_id: u64) -> Result<(), CliError> {
    let mut commerce = state.load_commerce();
    match commerce.remove_line(CartLineId::new(line_id)) {
        Some(line) => writeln!(stdout(), "Removed {} (line {line_id})", line.product_id)?,
        None => writeln!(stdout(), "No cart line with id {line_id}")?,
    }
    Ok(())
}

/// Empty the cart.
pub fn clear(state: &AppState) -> Result<(), CliError> {
    state.load_commerce().clear_cart();
    writeln!(stdout(), "Cart cleared")?;
    Ok(())
}

/// Add or remove a wishlist entry.
pub fn toggle_wishlist(state: &AppState, id: &str) -> Result<(), CliError> {
    let mut commerce = state.load_commerce();
    let added = commerce.toggle_wishlist(&ProductId::new(id));
    let verb = if added { "Added" } else { "Removed" };
    writeln!(stdout(), "{verb} {id} {} wishlist", if added { "to" } else { "from" })?;
    Ok(())
}

/// Print wishlisted products.
pub async fn show_wishlist(state: &AppState) -> Result<(), CliError> {
    let commerce = state.load_commerce();
    let products = state.resolver().wishlist(commerce.wishlist()).await;
    let mut out = stdout();

    if products.value.is_empty() {
        writeln!(out, "Your wishlist is empty")?;
        return Ok(());
    }
    for product in &products.value {
        writeln!(
            out,
            "{:<10} {:<48} {}",
            product.id.as_str(),
            product.name,
            display_price(product.price)
        )?;
    }
    Ok(())
}
