//! Storefront brands.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a brand name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid brand: {0}")]
pub struct BrandParseError(pub String);

/// The brand a product is sold under.
///
/// Stored as `category` on remote product rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    /// Corporate and personalised gifting.
    #[default]
    Uphaar,
    /// Personalised kids' products.
    Kyddoz,
    /// Seasonal festive hampers.
    Festive,
}

impl Brand {
    /// All brands in display order.
    pub const ALL: [Self; 3] = [Self::Uphaar, Self::Kyddoz, Self::Festive];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uphaar => "uphaar",
            Self::Kyddoz => "kyddoz",
            Self::Festive => "festive",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Brand {
    type Err = BrandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uphaar" => Ok(Self::Uphaar),
            "kyddoz" => Ok(Self::Kyddoz),
            "festive" => Ok(Self::Festive),
            _ => Err(BrandParseError(s.to_string())),
        }
    }
}
