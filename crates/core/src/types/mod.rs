//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod brand;
pub mod cart;
pub mod contact;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use brand::{Brand, BrandParseError};
pub use cart::{CartLine, CartOptions, options_key};
pub use contact::{ContactError, CustomerDetails, WhatsAppNumber};
pub use id::*;
pub use order::{NewOrder, OrderItem, OrderRecord};
pub use price::{CurrencyCode, Price, deserialize_numeric};
pub use product::{CustomizationField, Description, FieldKind, Product, SizeOption};
pub use status::*;
