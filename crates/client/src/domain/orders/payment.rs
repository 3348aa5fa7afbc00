//! Payment step for a single order.

use crate::{
    domain::orders::{models::OrderId, workflow::OrdersWorkflow},
    errors::ActionError,
    navigation::{Outcome, Route},
};

/// Payment form for one pending order.
///
/// Holds the visible error of the last attempt; a failed attempt can simply
/// be submitted again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentViewModel {
    order_id: OrderId,
    error: Option<String>,
}

impl PaymentViewModel {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            error: None,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Message from the last failed attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit `card_token` for this order and return the screen to go to.
    ///
    /// # Errors
    ///
    /// Returns the failure of the payment attempt; its message is also kept
    /// for display.
    pub async fn submit(
        &mut self,
        orders: &mut OrdersWorkflow,
        card_token: &str,
    ) -> Result<Route, ActionError> {
        self.error = None;

        match orders.pay(self.order_id, card_token).await {
            Ok(()) => Ok(Outcome::Paid(self.order_id).next_route()),
            Err(error) => {
                self.error = Some(error.message().to_string());

                Err(error)
            }
        }
    }
}
