//! Storefront flows built on the catalog, the stores and local storage.
//!
//! # Services
//!
//! - `resolver` - Remote-first product lookups with static catalog fallback
//! - `commerce` - Cart and wishlist state persisted to local storage
//! - `checkout` - Cart pricing, customization validation, form prefill
//! - `messaging` - WhatsApp order, enquiry and bulk order links
//! - `orders` - Order submission, order history and admin status updates
//! - `auth` - Sign-in gate with a deferred pending action

pub mod auth;
pub mod checkout;
pub mod commerce;
pub mod messaging;
pub mod orders;
pub mod resolver;

pub use auth::{AuthGate, AuthUser, Gate};
pub use checkout::{CheckoutError, CheckoutSummary, CustomerPrefill, ResolvedLine};
pub use commerce::{CartError, CommerceStore};
pub use messaging::ContactNumbers;
pub use orders::{OrderHistory, OrderPlacement, OrderSubmitter};
pub use resolver::{CatalogResolver, FallbackPolicy, Resolved, Source};
