//! Workflow errors.
//!
//! Every view-model operation reports failure as an [`ActionError`]: the text
//! to show the user plus the [`StorefrontError`] that caused it.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::StorefrontError;

/// Generic messages used when the backend gives no usable explanation.
pub mod messages {
    pub const LOAD_PRODUCTS: &str = "Could not load products.";
    pub const ADD_TO_CART: &str = "Could not add the item to the cart.";
    pub const LOAD_CART: &str = "Failed to load the cart.";
    pub const REMOVE_CART_ITEM: &str = "Could not remove the item from the cart.";
    pub const EMPTY_CART: &str = "Your cart is empty.";
    pub const CHECKOUT: &str = "Could not complete checkout.";
    pub const LOAD_ORDERS: &str = "Failed to load order history.";
    pub const CANCEL_ORDER: &str = "Could not cancel the order.";
    pub const CANCEL_NOT_PENDING: &str = "Only pending orders can be cancelled.";
    pub const PAY_NOT_PENDING: &str = "Only pending orders can be paid.";
    pub const NO_ORDER_TO_PAY: &str = "No order selected for payment.";
    pub const PAYMENT: &str = "An error occurred while processing the payment.";
    pub const INVALID_CARD: &str = "Invalid card number.";
    pub const MISSING_CREDENTIALS: &str = "Email and password are required.";
    pub const LOGIN: &str = "Could not log in.";
    pub const REGISTER: &str = "Error while registering.";
}

/// A failed user action, ready for display.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
    action: &'static str,
    message: String,
    #[source]
    cause: StorefrontError,
}

impl ActionError {
    /// Convert `cause` into a user-facing error for `action` and log it.
    pub(crate) fn new(action: &'static str, cause: StorefrontError, fallback: &str) -> Self {
        let message = cause.user_message(fallback);

        if let StorefrontError::Validation(_) = cause {
            info!(action, error = %cause, "storefront action rejected");
        } else {
            warn!(action, error = %cause, message = %message, "storefront action failed");
        }

        Self {
            action,
            message,
            cause,
        }
    }

    /// Shorthand for a client-side precondition failure.
    pub(crate) fn validation(action: &'static str, message: &str) -> Self {
        Self::new(
            action,
            StorefrontError::Validation(message.to_string()),
            message,
        )
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    /// Text to show the user.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &StorefrontError {
        &self.cause
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.cause, StorefrontError::Validation(_))
    }
}
