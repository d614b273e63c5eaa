//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for the storefront flows. Callers at
//! the edge (the CLI) report it with [`AppError::capture`] and show the
//! shopper [`AppError::user_message`].

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::services::checkout::CheckoutError;
use crate::services::commerce::CartError;
use crate::storage::StorageError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bundled catalog is invalid.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Checkout was blocked by validation.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Signed-in user lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a fault of the system rather than of the input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Storage(_) | Self::Catalog(_) | Self::Config(_) | Self::Internal(_)
        )
    }

    /// Report server errors to Sentry and log them.
    ///
    /// Validation and not-found errors are expected and are not reported.
    pub fn capture(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        }
    }

    /// Message safe to show to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Storage(_) | Self::Catalog(_) | Self::Internal(_) => {
                "Something went wrong, please try again".to_string()
            }
            Self::Config(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Forbidden(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this once the shopper is signed in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "up-01")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uphaar_core::ContactError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product up-99".to_string());
        assert_eq!(err.to_string(), "Not found: Product up-99");

        let err = AppError::Forbidden("admin only".to_string());
        assert_eq!(err.to_string(), "Forbidden: admin only");
    }

    #[test]
    fn test_server_errors() {
        assert!(AppError::Store(StoreError::NotConfigured).is_server_error());
        assert!(AppError::Internal("x".to_string()).is_server_error());
        assert!(!AppError::Checkout(CheckoutError::EmptyCart).is_server_error());
        assert!(!AppError::Cart(CartError::ZeroQuantity).is_server_error());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::Store(StoreError::Api {
            status: 500,
            message: "relation \"orders\" does not exist".to_string(),
        });
        assert_eq!(err.user_message(), "Something went wrong, please try again");

        let err = AppError::Checkout(CheckoutError::Contact(ContactError::MissingPhone));
        assert_eq!(err.user_message(), "customer phone number is required");
    }

    #[test]
    fn test_capture_without_client_is_noop() {
        // No Sentry client is bound in tests; capture must not panic
        AppError::Internal("boom".to_string()).capture();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "up-01")]));
        set_sentry_user(&"user-1", None);
        clear_sentry_user();
    }
}
