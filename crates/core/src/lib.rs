//! Uphaar Core - Shared types library.
//!
//! This crate provides common types used across all storefront components:
//! - `storefront` - Catalog, cart/wishlist state, checkout and order submission
//! - `cli` - Command-line driver for browsing, cart management and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no remote
//! store access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, brands, products, cart lines, orders and
//!   customer details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
