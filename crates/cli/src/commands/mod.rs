//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod orders;

use std::io::{self, StdoutLock};

use thiserror::Error;

use uphaar_core::{CartOptions, CurrencyCode, Price, Product, ProductId};
use uphaar_storefront::error::AppError;
use uphaar_storefront::services::auth::AuthUser;
use uphaar_storefront::services::checkout::CheckoutError;
use uphaar_storefront::services::commerce::CartError;
use uphaar_storefront::state::AppState;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    /// Bad command-line input the parser cannot catch.
    #[error("{0}")]
    Usage(String),
}

impl From<CheckoutError> for CliError {
    fn from(err: CheckoutError) -> Self {
        Self::App(err.into())
    }
}

impl From<CartError> for CliError {
    fn from(err: CartError) -> Self {
        Self::App(err.into())
    }
}

impl CliError {
    /// Report to Sentry where relevant and log the shopper-facing message.
    pub fn report(&self) {
        match self {
            Self::App(err) => {
                err.capture();
                tracing::error!("{}", err.user_message());
            }
            Self::Output(_) | Self::Usage(_) => tracing::error!("{self}"),
        }
    }
}

/// Parse a `key=value` customization argument.
///
/// # Errors
///
/// Returns a message if there is no `=` or the key is blank.
pub fn parse_option(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Collect parsed options; no options means `None`.
fn cart_options(options: Vec<(String, String)>) -> Option<CartOptions> {
    if options.is_empty() {
        None
    } else {
        Some(options.into_iter().collect())
    }
}

/// The signed-in user, or `AuthRequired` when `--user` is absent or blank.
fn signed_in(user: Option<&str>) -> Result<AuthUser, CheckoutError> {
    match user.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(AuthUser::new(id)),
        _ => Err(CheckoutError::AuthRequired),
    }
}

/// Resolve a product or fail with `NotFound`.
async fn find_product(state: &AppState, id: &str) -> Result<Product, AppError> {
    state
        .resolver()
        .product(&ProductId::new(id))
        .await
        .into_inner()
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
}

/// Price for display; zero means the price is given on enquiry.
fn display_price(price: Price) -> String {
    if price == Price::ZERO {
        "Price on request".to_string()
    } else {
        price.grouped(CurrencyCode::INR)
    }
}

fn stdout() -> StdoutLock<'static> {
    io::stdout().lock()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("color=Red with White").unwrap(),
            ("color".to_string(), "Red with White".to_string())
        );
        assert_eq!(parse_option("note=").unwrap(), ("note".to_string(), String::new()));
        assert!(parse_option("size").is_err());
        assert!(parse_option("=M").is_err());
    }

    #[test]
    fn test_cart_options_keep_order() {
        let options = cart_options(vec![
            ("size".to_string(), "M".to_string()),
            ("color".to_string(), "Red".to_string()),
        ])
        .unwrap();
        assert_eq!(options.keys().collect::<Vec<_>>(), ["size", "color"]);
        assert!(cart_options(vec![]).is_none());
    }

    #[test]
    fn test_signed_in_requires_user() {
        assert_eq!(signed_in(Some("u1")).unwrap().id.as_str(), "u1");
        assert_eq!(signed_in(None), Err(CheckoutError::AuthRequired));
        assert_eq!(signed_in(Some("  ")), Err(CheckoutError::AuthRequired));
    }

    #[test]
    fn test_display_price() {
        assert_eq!(display_price(Price::ZERO), "Price on request");
        assert_eq!(display_price(Price::new(1200)), "₹1,200");
    }
}
