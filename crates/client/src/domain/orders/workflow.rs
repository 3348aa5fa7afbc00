//! Checkout and order workflow.
//!
//! Turns the session cart into an order, lists orders, cancels pending ones
//! and submits payments. Local state is only touched after the backend
//! confirms a change.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::{debug, info};

use crate::{
    api::StorefrontApi,
    domain::{
        cart::{CartView, CartViewModel},
        orders::models::{CheckoutReceipt, Order, OrderId, OrderStatus, PaymentRequest},
    },
    errors::{ActionError, messages},
    loadable::Loadable,
};

/// Shortest card token accepted before anything is sent.
pub const MIN_CARD_TOKEN_LEN: usize = 5;

/// What the order history screen should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrdersView<'a> {
    Loading,
    Empty,
    Orders(&'a [Order]),
    Failed(&'a str),
}

/// Order lifecycle operations for the current session.
pub struct OrdersWorkflow {
    api: Arc<dyn StorefrontApi>,
    orders: Loadable<Vec<Order>>,
}

impl OrdersWorkflow {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            orders: Loadable::Loading,
        }
    }

    /// Create an order from the session cart.
    ///
    /// The request carries no body; the backend resolves the cart from the
    /// session. On success the local cart is emptied and the caller should
    /// move on to paying the returned order.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without any request, when the loaded cart
    /// is empty. Returns an error when the backend refuses the checkout or
    /// cannot be reached; the cart is left as it was.
    pub async fn checkout(
        &mut self,
        cart: &mut CartViewModel,
    ) -> Result<CheckoutReceipt, ActionError> {
        if cart.view() == CartView::Empty {
            return Err(ActionError::validation("checkout", messages::EMPTY_CART));
        }

        let receipt = self
            .api
            .checkout()
            .await
            .map_err(|cause| ActionError::new("checkout", cause, messages::CHECKOUT))?;

        cart.mark_checked_out();

        info!(order = %receipt.order_id, "checkout created order");

        Ok(receipt)
    }

    /// Fetch the session's orders, keeping the backend's ordering.
    ///
    /// # Errors
    ///
    /// Returns an error when the orders cannot be fetched.
    pub async fn load_orders(&mut self) -> Result<&[Order], ActionError> {
        self.orders = Loadable::Loading;

        match self.api.list_orders().await {
            Ok(orders) => {
                debug!(orders = orders.len(), "orders loaded");

                self.orders = Loadable::Loaded(orders);

                Ok(self.orders())
            }
            Err(cause) => {
                let error = ActionError::new("load_orders", cause, messages::LOAD_ORDERS);

                self.orders = Loadable::Failed(error.message().to_string());

                Err(error)
            }
        }
    }

    /// Cancel a pending order and drop it from the listing.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the backend when the
    /// order is known not to be pending, and an API error when the backend
    /// refuses; in both cases the order stays listed.
    pub async fn cancel_order(&mut self, order: OrderId) -> Result<(), ActionError> {
        if self.is_known_non_pending(order) {
            return Err(ActionError::validation(
                "cancel_order",
                messages::CANCEL_NOT_PENDING,
            ));
        }

        self.api
            .cancel_order(order)
            .await
            .map_err(|cause| ActionError::new("cancel_order", cause, messages::CANCEL_ORDER))?;

        if let Some(orders) = self.orders.loaded_mut() {
            orders.retain(|existing| existing.id != order);
        }

        info!(order = %order, "order cancelled");

        Ok(())
    }

    /// Charge `card_token` against a pending order.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without any request, when the token is
    /// shorter than [`MIN_CARD_TOKEN_LEN`] or the order is known not to be
    /// pending. Backend failures leave the order pending so the payment can be
    /// resubmitted.
    pub async fn pay(&mut self, order: OrderId, card_token: &str) -> Result<(), ActionError> {
        let card_token = card_token.trim();

        if card_token.chars().count() < MIN_CARD_TOKEN_LEN {
            return Err(ActionError::validation("pay", messages::INVALID_CARD));
        }

        if self.is_known_non_pending(order) {
            return Err(ActionError::validation("pay", messages::PAY_NOT_PENDING));
        }

        self.api
            .charge(PaymentRequest {
                order_id: order,
                card_token: card_token.to_string(),
            })
            .await
            .map_err(|cause| ActionError::new("pay", cause, messages::PAYMENT))?;

        if let Some(paid) = self
            .orders
            .loaded_mut()
            .and_then(|orders| orders.iter_mut().find(|existing| existing.id == order))
        {
            paid.status = OrderStatus::Paid;
        }

        info!(order = %order, "payment accepted");

        Ok(())
    }

    /// Loaded orders, empty unless a load succeeded.
    pub fn orders(&self) -> &[Order] {
        self.orders.loaded().map_or(&[], Vec::as_slice)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders().iter().find(|order| order.id == id)
    }

    pub fn view(&self) -> OrdersView<'_> {
        match &self.orders {
            Loadable::Loading => OrdersView::Loading,
            Loadable::Failed(message) => OrdersView::Failed(message),
            Loadable::Loaded(orders) if orders.is_empty() => OrdersView::Empty,
            Loadable::Loaded(orders) => OrdersView::Orders(orders),
        }
    }

    fn is_known_non_pending(&self, order: OrderId) -> bool {
        self.order(order)
            .is_some_and(|existing| !existing.status.is_pending())
    }
}

impl Debug for OrdersWorkflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrdersWorkflow")
            .field("orders", &self.orders)
            .finish_non_exhaustive()
    }
}
