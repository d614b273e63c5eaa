//! Whole-unit price representation.
//!
//! Catalog prices are plain non-negative integers in rupees; there are no
//! minor units, so arithmetic stays in `u64` and never rounds.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A price in whole currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// The zero price (also the contribution of an unresolved cart line).
    pub const ZERO: Self = Self(0);

    /// Create a price from whole units.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Round a decimal amount to whole units; negative or non-finite
    /// amounts become zero.
    #[must_use]
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() || amount <= 0.0 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // checked finite and positive above
        let whole = amount.round() as u64;
        Self(whole)
    }

    /// Get the amount in whole units.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Add two prices, saturating instead of overflowing.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Format with the currency symbol and no digit grouping (e.g. `₹1100`).
    #[must_use]
    pub fn plain(&self, currency: CurrencyCode) -> String {
        format!("{}{}", currency.symbol(), self.0)
    }

    /// Format with the currency symbol and Indian digit grouping
    /// (e.g. `₹1,10,000`).
    #[must_use]
    pub fn grouped(&self, currency: CurrencyCode) -> String {
        format!("{}{}", currency.symbol(), group_indian(self.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grouped(CurrencyCode::default()))
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

/// Deserialize a `numeric` column that may arrive as `550` or `550.0`.
///
/// Use with `#[serde(deserialize_with = "deserialize_numeric")]`.
///
/// # Errors
///
/// Returns the deserializer's error when the value is not a number.
pub fn deserialize_numeric<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numeric {
        Whole(u64),
        Decimal(f64),
    }

    Ok(match Numeric::deserialize(deserializer)? {
        Numeric::Whole(amount) => Price(amount),
        Numeric::Decimal(amount) => Price::from_decimal(amount),
    })
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// ISO 4217 currency codes the storefront prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
        }
    }
}

/// Group digits the en-IN way: last three, then pairs (`12,34,567`).
fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        if let Some(group) = head.get(start..end) {
            groups.push(group);
        }
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
