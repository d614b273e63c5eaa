//! Cart line items.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::id::{CartLineId, ProductId};

/// Chosen customization values keyed by form field name.
///
/// Insertion order is preserved because it is part of a line's identity:
/// see [`options_key`].
pub type CartOptions = IndexMap<String, String>;

/// Serialized form of a line's options used for merge comparisons.
///
/// No options serializes to the empty string; an empty map serializes to
/// `{}`. The comparison is order-sensitive, so `{size, color}` and
/// `{color, size}` are different keys.
#[must_use]
pub fn options_key(options: Option<&CartOptions>) -> String {
    options
        .and_then(|opts| serde_json::to_string(opts).ok())
        .unwrap_or_default()
}

/// One line in the shopper's in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Stable identity for removal.
    pub line_id: CartLineId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Always at least 1.
    pub quantity: u32,
    /// Customization choices, if any were made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CartOptions>,
}

impl CartLine {
    /// Whether this line would absorb an add of `product_id` with `options`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, options: Option<&CartOptions>) -> bool {
        self.product_id == *product_id && options_key(self.options.as_ref()) == options_key(options)
    }

    /// Option entries with a non-empty value, in insertion order.
    pub fn filled_options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .flat_map(|opts| opts.iter())
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(pairs: &[(&str, &str)]) -> CartOptions {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_options_key_none_vs_empty() {
        assert_eq!(options_key(None), "");
        assert_eq!(options_key(Some(&CartOptions::new())), "{}");
    }

    #[test]
    fn test_options_key_is_order_sensitive() {
        let a = opts(&[("size", "M"), ("color", "Red")]);
        let b = opts(&[("color", "Red"), ("size", "M")]);
        assert_ne!(options_key(Some(&a)), options_key(Some(&b)));
        assert_eq!(options_key(Some(&a)), r#"{"size":"M","color":"Red"}"#);
    }

    #[test]
    fn test_matches_requires_same_product_and_options() {
        let line = CartLine {
            line_id: CartLineId::new(1),
            product_id: ProductId::new("up-01"),
            quantity: 1,
            options: Some(opts(&[("size", "M")])),
        };

        assert!(line.matches(&ProductId::new("up-01"), Some(&opts(&[("size", "M")]))));
        assert!(!line.matches(&ProductId::new("up-01"), Some(&opts(&[("size", "L")]))));
        assert!(!line.matches(&ProductId::new("up-02"), Some(&opts(&[("size", "M")]))));
        assert!(!line.matches(&ProductId::new("up-01"), None));
    }

    #[test]
    fn test_filled_options_skips_blank_values() {
        let line = CartLine {
            line_id: CartLineId::new(1),
            product_id: ProductId::new("ky-01"),
            quantity: 1,
            options: Some(opts(&[("size", "Hand Towel"), ("customName", ""), ("color", "Pink")])),
        };

        let filled: Vec<_> = line.filled_options().collect();
        assert_eq!(filled, vec![("size", "Hand Towel"), ("color", "Pink")]);
    }
}
