//! WhatsApp enquiry and bulk order links.

use std::io::Write;

use uphaar_core::Brand;
use uphaar_storefront::services::messaging::{bulk_order_link, enquiry_link};
use uphaar_storefront::state::AppState;

use super::{CliError, cart_options, find_product, stdout};

/// Print an enquiry link for a product page.
pub async fn enquire(
    state: &AppState,
    id: &str,
    options: Vec<(String, String)>,
) -> Result<(), CliError> {
    let product = find_product(state, id).await?;
    let options = cart_options(options);
    let link = enquiry_link(&state.config().contacts, &product, options.as_ref());
    writeln!(stdout(), "{link}")?;
    Ok(())
}

/// Print a bulk order link for a brand page.
pub fn bulk(state: &AppState, brand: Brand) -> Result<(), CliError> {
    writeln!(stdout(), "{}", bulk_order_link(&state.config().contacts, brand))?;
    Ok(())
}
