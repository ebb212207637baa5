//! Checkout service
//!
//! Wraps order placement with the notifications that follow a commit: the
//! order confirmation, and the credentials of an account provisioned for a
//! guest.

use shared::error::AppResult;
use shared::models::{Order, OrderCreate};

use crate::auth::CurrentUser;
use crate::db::DocumentStore;
use crate::db::repository::OrderRepository;
use crate::db::repository::order::{Buyer, GuestCredentials, PlacedOrder};
use crate::notify::{SharedNotifier, account_created_text, order_placed_text};

use super::blocking;

#[derive(Clone)]
pub struct CheckoutService {
    orders: OrderRepository,
    notifier: SharedNotifier,
}

impl CheckoutService {
    pub fn new(store: DocumentStore, notifier: SharedNotifier) -> Self {
        Self {
            orders: OrderRepository::new(store),
            notifier,
        }
    }

    pub async fn place(&self, caller: Option<&CurrentUser>, data: OrderCreate) -> AppResult<Order> {
        let contact_email = data.contact_info.email.trim().to_lowercase();
        let buyer = match caller {
            Some(user) => Buyer::User(&user.id),
            None => Buyer::Guest(blocking(GuestCredentials::generate).await??),
        };
        let PlacedOrder {
            order,
            guest_account,
        } = self.orders.place(buyer, data)?;

        if let Some(account) = guest_account {
            self.notifier
                .send_email(
                    &account.user.email,
                    "Your bookstore account",
                    &account_created_text(&account.user.email, &account.password),
                )
                .await?;
        }
        self.notifier
            .send_email(
                &contact_email,
                &format!("Order #{}", order.number),
                &order_placed_text(order.number),
            )
            .await?;

        Ok(order)
    }
}
