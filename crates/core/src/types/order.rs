//! Submitted orders.
//!
//! Line items are snapshots taken at checkout, so later catalog edits never
//! change what a historical order says was bought or for how much.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartOptions;
use super::contact::CustomerDetails;
use super::id::{OrderId, ProductId, UserId};
use super::price::{Price, deserialize_numeric};
use super::status::OrderStatus;

/// Snapshot of one purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time of the order.
    #[serde(deserialize_with = "deserialize_numeric")]
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CartOptions>,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An order about to be inserted into the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub customer_details: CustomerDetails,
    pub status: OrderStatus,
}

/// An order as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    #[serde(deserialize_with = "deserialize_numeric")]
    pub total: Price,
    pub customer_details: CustomerDetails,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_record_from_row() {
        let json = r#"{
            "id": "5b0c1c3e-0000-4000-8000-000000000001",
            "user_id": "user-1",
            "items": [
                {"product_id": "up-01", "name": "Tipping T-Shirts", "price": 550,
                 "quantity": 2, "options": {"size": "M"}}
            ],
            "total": 1100,
            "customer_details": {"name": "Asha", "phone": "9820000000"},
            "status": "placed",
            "created_at": "2026-01-15T10:30:00Z"
        }"#;

        let order: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(order.items[0].line_total(), Price::new(1100));
        assert_eq!(order.status.as_str(), "placed");
        assert!(order.created_at.is_some());
        assert!(order.updated_at.is_none());
        assert_eq!(order.customer_details.phone(), "9820000000");
    }

    #[test]
    fn test_order_record_with_decimal_prices() {
        let json = r#"[{
            "id": "5b0c1c3e-0000-4000-8000-000000000002",
            "user_id": "user-1",
            "items": [
                {"product_id": "up-01", "name": "Tipping T-Shirts", "price": 550.0, "quantity": 2},
                {"product_id": "ky-02", "name": "Name Pencil Set", "price": 189.6, "quantity": 1}
            ],
            "total": 1290.0,
            "customer_details": {"name": "Asha", "phone": "9820000000"}
        }]"#;

        let orders: Vec<OrderRecord> = serde_json::from_str(json).unwrap();
        let order = &orders[0];
        assert_eq!(order.items[0].price, Price::new(550));
        assert_eq!(order.items[1].price, Price::new(190));
        assert_eq!(order.total, Price::new(1290));
    }

    #[test]
    fn test_order_item_rejects_non_numeric_price() {
        let json = r#"{"product_id": "up-01", "name": "Tee", "price": "550", "quantity": 1}"#;
        assert!(serde_json::from_str::<OrderItem>(json).is_err());
    }

    #[test]
    fn test_new_order_serializes_status() {
        let order = NewOrder {
            user_id: UserId::new("user-1"),
            items: vec![],
            total: Price::ZERO,
            customer_details: CustomerDetails::new("Asha", "1").unwrap(),
            status: OrderStatus::placed(),
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], "placed");
        assert_eq!(value["total"], 0);
    }
}
