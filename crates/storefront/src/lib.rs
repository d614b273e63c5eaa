//! Uphaar & Kyddoz storefront library.
//!
//! Catalog lookups with a bundled fallback, cart and wishlist state,
//! checkout, and WhatsApp order submission. The CLI drives it; the
//! integration tests exercise it against in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;
