//! Status values for orders and profiles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order status.
///
/// Free-form on the remote store: the storefront only ever writes `placed`,
/// and the admin screen may set any label afterwards (`shipped`,
/// `delivered`, ...), so this is a string rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    /// Status written when an order is submitted.
    pub const PLACED: &'static str = "placed";
    /// Status the admin screen sets once an order is fulfilled.
    pub const COMPLETED: &'static str = "completed";

    /// Create a status from any label.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// The `placed` status.
    #[must_use]
    pub fn placed() -> Self {
        Self(Self::PLACED.to_string())
    }

    /// The `completed` status.
    #[must_use]
    pub fn completed() -> Self {
        Self(Self::COMPLETED.to_string())
    }

    /// Whether the order has been marked completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.0 == Self::COMPLETED
    }

    /// Get the status label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::placed()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    /// Can view all orders and change their status.
    Admin,
    /// Regular shopper.
    #[default]
    User,
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid profile role: {s}")),
        }
    }
}
