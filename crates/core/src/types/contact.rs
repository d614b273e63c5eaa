//! Customer contact details and messaging numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating contact details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The customer name is empty.
    #[error("customer name is required")]
    MissingName,
    /// The customer phone number is empty.
    #[error("customer phone number is required")]
    MissingPhone,
    /// A messaging number contains something other than digits.
    #[error("invalid messaging number: {0}")]
    InvalidNumber(String),
}

/// Name and phone the shopper enters at checkout.
///
/// Both fields are required. Surrounding whitespace is trimmed, and a value
/// that is empty after trimming is rejected.
///
/// ```
/// use uphaar_core::{ContactError, CustomerDetails};
///
/// assert!(CustomerDetails::new("Asha", "98200 00000").is_ok());
/// assert_eq!(CustomerDetails::new("Asha", " "), Err(ContactError::MissingPhone));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    name: String,
    phone: String,
}

impl CustomerDetails {
    /// Validate and build customer details.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::MissingName` or `ContactError::MissingPhone` if
    /// either field is blank. The name is checked first.
    pub fn new(name: &str, phone: &str) -> Result<Self, ContactError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactError::MissingName);
        }

        let phone = phone.trim();
        if phone.is_empty() {
            return Err(ContactError::MissingPhone);
        }

        Ok(Self {
            name: name.to_owned(),
            phone: phone.to_owned(),
        })
    }

    /// Customer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Customer phone number, as entered.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// A WhatsApp destination number.
///
/// Accepts an optional leading `+` followed by digits; spaces and dashes are
/// ignored. Stored as bare digits, which is what deep links expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WhatsAppNumber(String);

impl WhatsAppNumber {
    /// Parse a number such as `+91 87671 74252`.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::InvalidNumber` if the input has no digits or
    /// contains characters other than digits, spaces, dashes and a leading `+`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut digits = String::with_capacity(body.len());
        for c in body.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(ContactError::InvalidNumber(s.to_string())),
            }
        }

        if digits.is_empty() {
            return Err(ContactError::InvalidNumber(s.to_string()));
        }

        Ok(Self(digits))
    }

    /// Bare digits, without `+`.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WhatsAppNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

impl std::str::FromStr for WhatsAppNumber {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WhatsAppNumber {
    type Error = ContactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WhatsAppNumber> for String {
    fn from(number: WhatsAppNumber) -> Self {
        number.0
    }
}
