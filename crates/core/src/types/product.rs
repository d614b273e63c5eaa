//! Product records shared by the static catalog and the remote store.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::brand::Brand;
use super::cart::CartOptions;
use super::id::ProductId;
use super::price::Price;

/// A sellable product.
///
/// Read-only from the storefront's point of view: defined in the bundled
/// catalog or maintained through the admin surface of the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Globally unique across the combined catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in whole rupees. Zero means "price on request".
    pub price: Price,
    /// Brand the product is sold under.
    pub brand: Brand,
    /// Ordered image URLs; the first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Optional badge (e.g. "Featured", "Limited").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    /// Bullet-point feature list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Available sizes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<SizeOption>,
    /// Fields the shopper fills in before adding to cart.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customization_form: Vec<CustomizationField>,
    /// Image aspect ratio hint (e.g. "4/5").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

impl Product {
    /// The primary (first) image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product has a customization form.
    #[must_use]
    pub fn is_customizable(&self) -> bool {
        !self.customization_form.is_empty()
    }

    /// Look up a customization field by its name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&CustomizationField> {
        self.customization_form.iter().find(|f| f.name == name)
    }

    /// Required customization fields with no (or a blank) value in `options`,
    /// in form order.
    #[must_use]
    pub fn missing_required_fields(&self, options: Option<&CartOptions>) -> Vec<&CustomizationField> {
        self.customization_form
            .iter()
            .filter(|field| field.required)
            .filter(|field| {
                options
                    .and_then(|opts| opts.get(&field.name))
                    .is_none_or(|value| value.trim().is_empty())
            })
            .collect()
    }
}

/// Product description: a paragraph or an ordered list of paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Lines(Vec<String>),
}

impl Description {
    /// The description as a list of paragraphs.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

/// A size entry: either a bare label (`"M"`) or a label with dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeOption {
    Plain(String),
    Labeled { label: String, size: String },
}

impl fmt::Display for SizeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(size) => f.write_str(size),
            Self::Labeled { label, size } => write!(f, "{label} ({size})"),
        }
    }
}

/// Input kind of a customization field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text (e.g. a name to embroider).
    #[default]
    Text,
    /// Pick one of `options`.
    Select,
}

/// One field of a product's customization form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationField {
    /// Key used in the cart line's options map.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Input kind.
    #[serde(default)]
    pub kind: FieldKind,
    /// Choices for select fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Whether a value must be supplied before adding to cart.
    #[serde(default)]
    pub required: bool,
    /// Input placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}
