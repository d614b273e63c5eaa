//! WhatsApp order messages and deep links.
//!
//! Orders are completed by handing the shopper a WhatsApp link carrying a
//! pre-written message. Carts with any Kyddoz product go to the Kyddoz
//! number; everything else goes to the Uphaar number.

use std::fmt::Write as _;

use uphaar_core::{Brand, CartOptions, CurrencyCode, CustomerDetails, OrderRecord, Product, WhatsAppNumber};

use super::checkout::CheckoutSummary;

const CURRENCY: CurrencyCode = CurrencyCode::INR;

/// Order destination numbers per brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNumbers {
    /// Default destination (Uphaar and festive products).
    pub uphaar: WhatsAppNumber,
    /// Destination for anything containing Kyddoz products.
    pub kyddoz: WhatsAppNumber,
}

impl ContactNumbers {
    /// Number handling a single brand.
    #[must_use]
    pub const fn for_brand(&self, brand: Brand) -> &WhatsAppNumber {
        match brand {
            Brand::Kyddoz => &self.kyddoz,
            Brand::Uphaar | Brand::Festive => &self.uphaar,
        }
    }

    /// Number a cart is routed to.
    #[must_use]
    pub fn route(&self, summary: &CheckoutSummary) -> &WhatsAppNumber {
        if summary.contains_brand(Brand::Kyddoz) {
            &self.kyddoz
        } else {
            &self.uphaar
        }
    }
}

/// Build the order message for the shopper to send.
#[must_use]
pub fn order_message(customer: &CustomerDetails, summary: &CheckoutSummary) -> String {
    let mut message = String::from("Hello, I would like to place an order.\n\n");
    let _ = writeln!(message, "Customer Name: {}", customer.name());
    let _ = writeln!(message, "Phone Number: {}", customer.phone());
    message.push_str("\nProducts:\n");

    for (index, line) in summary.lines.iter().enumerate() {
        let _ = writeln!(
            message,
            "{}. {} x {} – {}",
            index + 1,
            line.name(),
            line.quantity,
            line.line_total().plain(CURRENCY)
        );

        let customizations: Vec<String> = line
            .filled_options()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();
        if !customizations.is_empty() {
            let _ = writeln!(message, "   Customization: {}", customizations.join(", "));
        }
    }

    let _ = write!(
        message,
        "\nTotal Amount: {} (Excluding Shipping)\n\nOrder Type: Normal",
        summary.total.grouped(CURRENCY)
    );
    message
}

/// `api.whatsapp.com` link used for order submission.
#[must_use]
pub fn order_link(number: &WhatsAppNumber, message: &str) -> String {
    format!(
        "https://api.whatsapp.com/send?phone={}&text={}",
        number.digits(),
        urlencoding::encode(message)
    )
}

/// `wa.me` chat link with a pre-written message.
#[must_use]
pub fn chat_link(number: &WhatsAppNumber, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        number.digits(),
        urlencoding::encode(message)
    )
}

/// Product page enquiry.
///
/// Kyddoz products are bought directly ("buy now" with the price); other
/// products ask for a quote. Filled customization fields are listed by their
/// form label, in form order.
#[must_use]
pub fn enquiry_message(product: &Product, options: Option<&CartOptions>) -> String {
    let mut message = match product.brand {
        Brand::Kyddoz => format!(
            "Hello, I would like to place an order for *{}* (Price: {}).\n\n",
            product.name,
            product.price.plain(CURRENCY)
        ),
        Brand::Uphaar | Brand::Festive => format!(
            "Hello, I am interested in knowing the price for *{}*.\n\n",
            product.name
        ),
    };

    message.push_str("*Details:*\n");
    if let Some(options) = options {
        if product.is_customizable() {
            for field in &product.customization_form {
                if let Some(value) = options.get(&field.name).filter(|v| !v.is_empty()) {
                    let _ = writeln!(message, "- {}: {value}", field.label);
                }
            }
        } else {
            for (key, label) in [("color", "Color"), ("size", "Size")] {
                if let Some(value) = options.get(key).filter(|v| !v.is_empty()) {
                    let _ = writeln!(message, "- {label}: {value}");
                }
            }
        }
    }
    message
}

/// Enquiry link for a product page.
#[must_use]
pub fn enquiry_link(
    contacts: &ContactNumbers,
    product: &Product,
    options: Option<&CartOptions>,
) -> String {
    chat_link(
        contacts.for_brand(product.brand),
        &enquiry_message(product, options),
    )
}

/// Bulk order template for a brand page.
#[must_use]
pub fn bulk_order_message(brand: Brand) -> String {
    let opening = match brand {
        Brand::Kyddoz => "Hello, I would like to place a bulk Kyddoz order.",
        Brand::Uphaar | Brand::Festive => "Hello, I would like to place a bulk order.",
    };
    format!("{opening}\nCustomer Name:\nPhone Number:\nQuantity:\nNotes:\nOrder Type: Bulk")
}

/// Bulk order link for a brand page.
#[must_use]
pub fn bulk_order_link(contacts: &ContactNumbers, brand: Brand) -> String {
    chat_link(contacts.for_brand(brand), &bulk_order_message(brand))
}

/// Admin follow-up link for an order; the admin picks the recipient.
#[must_use]
pub fn order_follow_up_link(order: &OrderRecord) -> String {
    let short_id: String = order.id.as_str().chars().take(8).collect();
    let message = format!(
        "Hi {}, regarding your order #{short_id}...",
        order.customer_details.name()
    );
    format!("https://wa.me/?text={}", urlencoding::encode(&message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::services::checkout::resolve_cart;
    use crate::services::resolver::CatalogResolver;
    use crate::store::OfflineStore;
    use uphaar_core::{CartLine, CartLineId, OrderId, OrderStatus, Price, ProductId, UserId};

    fn contacts() -> ContactNumbers {
        ContactNumbers {
            uphaar: WhatsAppNumber::parse("+91 98211 41072").unwrap(),
            kyddoz: WhatsAppNumber::parse("+918767174252").unwrap(),
        }
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::bundled().unwrap()
    }

    fn opts(pairs: &[(&str, &str)]) -> CartOptions {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    async fn summary(lines: &[(&str, u32, Option<CartOptions>)]) -> CheckoutSummary {
        let resolver = CatalogResolver::new(Arc::new(OfflineStore), Arc::new(catalog()));
        let cart: Vec<CartLine> = lines
            .iter()
            .zip(1..)
            .map(|((id, qty, options), line_id)| CartLine {
                line_id: CartLineId::new(line_id),
                product_id: ProductId::new(*id),
                quantity: *qty,
                options: options.clone(),
            })
            .collect();
        resolve_cart(&cart, &resolver).await
    }

    #[tokio::test]
    async fn test_order_message_format() {
        let summary = summary(&[
            ("up-01", 2, Some(opts(&[("size", "M"), ("color", ""), ("note", "Gift")]))),
            ("up-8440", 10, None),
        ])
        .await;
        let customer = CustomerDetails::new("Asha", "9820000000").unwrap();

        let expected = "Hello, I would like to place an order.\n\
            \n\
            Customer Name: Asha\n\
            Phone Number: 9820000000\n\
            \n\
            Products:\n\
            1. Tipping T-Shirts x 2 – ₹1100\n   Customization: size: M, note: Gift\n\
            2. Employee Joining Kit x 10 – ₹12000\n\
            \n\
            Total Amount: ₹13,100 (Excluding Shipping)\n\
            \n\
            Order Type: Normal";

        assert_eq!(order_message(&customer, &summary), expected);
    }

    #[tokio::test]
    async fn test_routing() {
        let contacts = contacts();
        let uphaar_only = summary(&[("up-01", 1, None), ("fpick-01", 1, None)]).await;
        assert_eq!(contacts.route(&uphaar_only).digits(), "919821141072");

        let mixed = summary(&[("up-01", 1, None), ("ky-01", 1, None)]).await;
        assert_eq!(contacts.route(&mixed).digits(), "918767174252");

        // Unresolved lines have no brand
        let ghost = summary(&[("ghost", 1, None)]).await;
        assert_eq!(contacts.route(&ghost).digits(), "919821141072");
    }

    #[test]
    fn test_order_link_encodes_message() {
        let link = order_link(&contacts().uphaar, "Total Amount: ₹1,100\nOrder Type: Normal");
        assert!(link.starts_with("https://api.whatsapp.com/send?phone=919821141072&text="));
        assert!(link.contains("%E2%82%B9"));
        assert!(link.contains("%0A"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_enquiry_messages() {
        let catalog = catalog();
        let towel = catalog.get(&ProductId::new("ky-01")).unwrap();
        let message = enquiry_message(
            towel,
            Some(&opts(&[("customName", "Aarav"), ("size", "Hand Towel (16×24\")")])),
        );
        assert!(message.starts_with(
            "Hello, I would like to place an order for *Embroidered Personalised Egyptian Wonder Towels* (Price: ₹850)."
        ));
        // Form order, not insertion order
        assert!(message.ends_with("*Details:*\n- Select Size: Hand Towel (16×24\")\n- Custom Name: Aarav\n"));

        let shirt = catalog.get(&ProductId::new("up-01")).unwrap();
        let message = enquiry_message(shirt, None);
        assert_eq!(
            message,
            "Hello, I am interested in knowing the price for *Tipping T-Shirts*.\n\n*Details:*\n"
        );
    }

    #[test]
    fn test_enquiry_link_routes_by_brand() {
        let catalog = catalog();
        let towel = catalog.get(&ProductId::new("ky-01")).unwrap();
        assert!(enquiry_link(&contacts(), towel, None).starts_with("https://wa.me/918767174252?text="));
    }

    #[test]
    fn test_bulk_order_link() {
        let link = bulk_order_link(&contacts(), Brand::Kyddoz);
        assert!(link.starts_with("https://wa.me/918767174252?text=Hello%2C%20I%20would%20like%20to%20place%20a%20bulk%20Kyddoz%20order."));
        assert!(link.ends_with("Order%20Type%3A%20Bulk"));
        assert!(bulk_order_message(Brand::Uphaar).starts_with("Hello, I would like to place a bulk order."));
    }

    #[test]
    fn test_order_follow_up_link() {
        let order = OrderRecord {
            id: OrderId::new("5b0c1c3e-0000-4000-8000-000000000001"),
            user_id: UserId::new("u1"),
            items: vec![],
            total: Price::ZERO,
            customer_details: CustomerDetails::new("Asha", "1").unwrap(),
            status: OrderStatus::placed(),
            created_at: None,
            updated_at: None,
        };
        assert_eq!(
            order_follow_up_link(&order),
            "https://wa.me/?text=Hi%20Asha%2C%20regarding%20your%20order%20%235b0c1c3e..."
        );
    }
}
