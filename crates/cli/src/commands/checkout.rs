//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! uphaar --user <USER_ID> checkout --name Asha --phone 9820000000
//! ```
//!
//! Name and phone default to the signed-in user's profile. The printed link
//! completes the order on WhatsApp; the order row is written in the
//! background and the command waits for it only before exiting.

use std::io::Write;

use tracing::{info, warn};

use uphaar_storefront::services::checkout::{prefill_customer, resolve_cart};
use uphaar_storefront::state::AppState;

use super::{CliError, signed_in, stdout};

/// Place the cart as an order.
pub async fn run(
    state: &AppState,
    user: Option<&str>,
    name: Option<String>,
    phone: Option<String>,
) -> Result<(), CliError> {
    let user = signed_in(user)?;
    let commerce = state.load_commerce();

    let (summary, prefill) = tokio::join!(
        resolve_cart(commerce.cart(), state.resolver()),
        prefill_customer(state.profiles(), Some(&user.id)),
    );

    let name = name.unwrap_or(prefill.name);
    let phone = phone.unwrap_or(prefill.phone);
    let placement = state
        .submitter()
        .place_order(&user, &name, &phone, &summary)?;

    let mut out = stdout();
    writeln!(out, "{}\n", placement.message)?;
    writeln!(out, "Send your order on WhatsApp ({}):", placement.destination)?;
    writeln!(out, "{}", placement.redirect)?;
    drop(out);

    match placement.persistence.await {
        Ok(Some(record)) => info!(order_id = %record.id, "Order recorded"),
        Ok(None) => warn!("Order was not recorded; the WhatsApp message still completes it"),
        Err(e) => warn!(error = %e, "Order write task did not finish"),
    }
    Ok(())
}
