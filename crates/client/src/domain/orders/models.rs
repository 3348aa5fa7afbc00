//! Order Models

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use zeroize::Zeroize;

use crate::{domain::quantity::Quantity, ids::TypedId, money};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Order status as reported by the backend.
///
/// The vocabulary is owned by the backend; values outside the known three are
/// kept verbatim in [`OrderStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    /// Decode a backend status string, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        match trimmed.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "paid" => Self::Paid,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Order line: a frozen snapshot of what was bought.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_price: Decimal,
}

impl OrderLine {
    /// `None` when the product does not fit a [`Decimal`].
    pub fn subtotal(&self) -> Option<Decimal> {
        money::line_subtotal(self.unit_price, self.quantity.as_non_zero())
    }
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,

    /// Total fixed by the backend at checkout time.
    pub total: Decimal,
}

impl Order {
    /// Sum of the line subtotals, for cross-checking the stored total.
    pub fn computed_total(&self) -> Option<Decimal> {
        money::sum_lines(
            self.items
                .iter()
                .map(|line| (line.unit_price, line.quantity.as_non_zero())),
        )
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
}

/// Payment submission for a pending order. The card token is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub card_token: String,
}

impl Debug for PaymentRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PaymentRequest")
            .field("order_id", &self.order_id)
            .field("card_token", &"<redacted>")
            .finish()
    }
}

impl Drop for PaymentRequest {
    fn drop(&mut self) {
        self.card_token.zeroize();
    }
}
