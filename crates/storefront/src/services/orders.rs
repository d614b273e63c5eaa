//! Order submission, order history and admin status updates.
//!
//! # Submission
//!
//! Placing an order has two independent effects:
//!
//! 1. the order row is inserted into the remote store on a detached task,
//!    once, with no retry; a failure is logged and nothing else happens;
//! 2. the WhatsApp link carrying the order message is returned right away.
//!
//! The link is the order-completion mechanism, so it never waits on the
//! insert. The task handle is returned only so callers can observe it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span, instrument};

use uphaar_core::{
    CustomerDetails, NewOrder, OrderId, OrderRecord, OrderStatus, Price, UserId, WhatsAppNumber,
};

use super::auth::AuthUser;
use super::checkout::{CheckoutError, CheckoutSummary};
use super::messaging::{ContactNumbers, order_link, order_message};
use crate::error::{AppError, add_breadcrumb};
use crate::store::{OrderStore, Profile, ProfileStore};

/// Result of placing an order.
#[derive(Debug)]
pub struct OrderPlacement {
    /// WhatsApp link to send the shopper to.
    pub redirect: String,
    /// Plain-text order message carried by the link.
    pub message: String,
    /// Number the order was routed to.
    pub destination: WhatsAppNumber,
    /// Order total.
    pub total: Price,
    /// Detached insert; resolves to the stored row, or `None` if it failed.
    pub persistence: JoinHandle<Option<OrderRecord>>,
}

/// Places orders.
#[derive(Clone)]
pub struct OrderSubmitter {
    orders: Arc<dyn OrderStore>,
    contacts: ContactNumbers,
}

impl OrderSubmitter {
    /// Create a submitter writing to `orders` and routing to `contacts`.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderStore>, contacts: ContactNumbers) -> Self {
        Self { orders, contacts }
    }

    /// The configured destination numbers.
    #[must_use]
    pub const fn contacts(&self) -> &ContactNumbers {
        &self.contacts
    }

    /// Validate, start the order insert and build the WhatsApp redirect.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart and
    /// `CheckoutError::Contact` if the name or phone is blank. Nothing is
    /// written and no link is built when validation fails.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[instrument(skip(self, name, phone, summary), fields(user_id = %user.id, lines = summary.lines.len()))]
    pub fn place_order(
        &self,
        user: &AuthUser,
        name: &str,
        phone: &str,
        summary: &CheckoutSummary,
    ) -> Result<OrderPlacement, CheckoutError> {
        if summary.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let customer = CustomerDetails::new(name, phone)?;

        let order = NewOrder {
            user_id: user.id.clone(),
            items: summary.order_items(),
            total: summary.total,
            customer_details: customer.clone(),
            status: OrderStatus::placed(),
        };
        let persistence = self.spawn_insert(order);

        let destination = self.contacts.route(summary).clone();
        let message = order_message(&customer, summary);
        let redirect = order_link(&destination, &message);

        add_breadcrumb("checkout", "Order placed", Some(&[("destination", destination.digits())]));
        info!(total = %summary.total, destination = %destination, "Order handed to WhatsApp");

        Ok(OrderPlacement {
            redirect,
            message,
            destination,
            total: summary.total,
            persistence,
        })
    }

    fn spawn_insert(&self, order: NewOrder) -> JoinHandle<Option<OrderRecord>> {
        let orders = Arc::clone(&self.orders);
        let span = info_span!("save_order", user_id = %order.user_id);

        tokio::spawn(
            async move {
                match orders.insert_order(&order).await {
                    Ok(record) => {
                        info!(order_id = %record.id, "Order saved");
                        Some(record)
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to save order");
                        None
                    }
                }
            }
            .instrument(span),
        )
    }
}

// =============================================================================
// Order history
// =============================================================================

/// Reads orders for the profile page and the admin screen.
#[derive(Clone)]
pub struct OrderHistory {
    orders: Arc<dyn OrderStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl OrderHistory {
    /// Create an order history over the given stores.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { orders, profiles }
    }

    /// Orders placed by `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the remote store fails.
    #[instrument(skip(self, user), fields(user_id = %user))]
    pub async fn for_user(&self, user: &UserId) -> Result<Vec<OrderRecord>, AppError> {
        Ok(self.orders.orders_for_user(user).await?)
    }

    /// The profile of `user` if it has the admin role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` if the profile is missing or not an
    /// admin, and `AppError::Store` if the remote store fails.
    pub async fn ensure_admin(&self, user: &UserId) -> Result<Profile, AppError> {
        match self.profiles.profile(user).await? {
            Some(profile) if profile.is_admin() => Ok(profile),
            _ => Err(AppError::Forbidden(format!("{user} is not an admin"))),
        }
    }

    /// All orders, newest first. Admin only.
    ///
    /// # Errors
    ///
    /// See [`OrderHistory::ensure_admin`].
    #[instrument(skip(self, admin), fields(admin_id = %admin))]
    pub async fn all_orders(&self, admin: &UserId) -> Result<Vec<OrderRecord>, AppError> {
        self.ensure_admin(admin).await?;
        Ok(self.orders.all_orders().await?)
    }

    /// Set an order's status. Admin only.
    ///
    /// # Errors
    ///
    /// See [`OrderHistory::ensure_admin`]; also `AppError::Store` with
    /// `StoreError::NotFound` if the order does not exist.
    #[instrument(skip(self, admin), fields(admin_id = %admin))]
    pub async fn set_status(
        &self,
        admin: &UserId,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderRecord, AppError> {
        self.ensure_admin(admin).await?;
        let record = self.orders.update_order_status(order_id, &status).await?;
        info!(order_id = %record.id, status = %record.status, "Order status updated");
        Ok(record)
    }

    /// Mark completed, or reopen a completed order. Admin only.
    ///
    /// # Errors
    ///
    /// See [`OrderHistory::set_status`].
    pub async fn toggle_completed(
        &self,
        admin: &UserId,
        order: &OrderRecord,
    ) -> Result<OrderRecord, AppError> {
        let next = if order.status.is_completed() {
            OrderStatus::placed()
        } else {
            OrderStatus::completed()
        };
        self.set_status(admin, &order.id, next).await
    }
}
