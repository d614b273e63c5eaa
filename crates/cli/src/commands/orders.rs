//! Order history and admin order commands.
//!
//! # Usage
//!
//! ```bash
//! # The signed-in user's orders
//! uphaar --user <USER_ID> orders list
//!
//! # Admin: every order, status changes and follow-up links
//! uphaar --user <ADMIN_ID> orders all
//! uphaar --user <ADMIN_ID> orders set-status <ORDER_ID> shipped
//! uphaar --user <ADMIN_ID> orders complete <ORDER_ID>
//! uphaar --user <ADMIN_ID> orders follow-up <ORDER_ID>
//! ```

use std::io::Write;

use uphaar_core::{CurrencyCode, OrderId, OrderRecord, OrderStatus, UserId};
use uphaar_storefront::error::AppError;
use uphaar_storefront::services::messaging::order_follow_up_link;
use uphaar_storefront::state::AppState;

use super::{CliError, signed_in, stdout};

/// Print the signed-in user's orders.
pub async fn list(state: &AppState, user: Option<&str>) -> Result<(), CliError> {
    let user = signed_in(user)?;
    let orders = state.history().for_user(&user.id).await?;
    print_orders(&orders, false)
}

/// Print all orders. Admin only.
pub async fn all(state: &AppState, user: Option<&str>) -> Result<(), CliError> {
    let admin = signed_in(user)?;
    let orders = state.history().all_orders(&admin.id).await?;
    print_orders(&orders, true)
}

/// Set an order's status. Admin only.
pub async fn set_status(
    state: &AppState,
    user: Option<&str>,
    order_id: &str,
    status: &str,
) -> Result<(), CliError> {
    let status = status.trim();
    if status.is_empty() {
        return Err(CliError::Usage("Status must not be empty".to_string()));
    }

    let admin = signed_in(user)?;
    let record = state
        .history()
        .set_status(&admin.id, &OrderId::new(order_id), OrderStatus::new(status))
        .await?;
    writeln!(stdout(), "Order {} is now {}", record.id, record.status)?;
    Ok(())
}

/// Flip an order between placed and completed. Admin only.
pub async fn toggle_completed(
    state: &AppState,
    user: Option<&str>,
    order_id: &str,
) -> Result<(), CliError> {
    let admin = signed_in(user)?;
    let order = find_order(state, &admin.id, order_id).await?;
    let record = state.history().toggle_completed(&admin.id, &order).await?;
    writeln!(stdout(), "Order {} is now {}", record.id, record.status)?;
    Ok(())
}

/// Print a WhatsApp follow-up link for an order. Admin only.
pub async fn follow_up(state: &AppState, user: Option<&str>, order_id: &str) -> Result<(), CliError> {
    let admin = signed_in(user)?;
    let order = find_order(state, &admin.id, order_id).await?;
    writeln!(stdout(), "{}", order_follow_up_link(&order))?;
    Ok(())
}

async fn find_order(state: &AppState, admin: &UserId, order_id: &str) -> Result<OrderRecord, AppError> {
    state
        .history()
        .all_orders(admin)
        .await?
        .into_iter()
        .find(|order| order.id.as_str() == order_id)
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))
}

fn print_orders(orders: &[OrderRecord], with_customer: bool) -> Result<(), CliError> {
    let mut out = stdout();
    if orders.is_empty() {
        writeln!(out, "No orders yet")?;
        return Ok(());
    }

    for order in orders {
        let placed = order
            .created_at
            .map_or_else(|| "-".to_string(), |at| at.format("%d %b %Y").to_string());
        writeln!(
            out,
            "{}  {placed}  {}  {}",
            order.id,
            order.status,
            order.total.grouped(CurrencyCode::INR)
        )?;
        if with_customer {
            writeln!(
                out,
                "  {} · {}",
                order.customer_details.name(),
                order.customer_details.phone()
            )?;
        }
        for item in &order.items {
            writeln!(
                out,
                "  - {} x {} – {}",
                item.name,
                item.quantity,
                item.line_total().plain(CurrencyCode::INR)
            )?;
        }
    }
    Ok(())
}
