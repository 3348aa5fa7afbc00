//! Order status projection: what an order looks like and what can be done with it.

use rust_decimal::Decimal;

use crate::domain::{
    orders::models::{Order, OrderId, OrderStatus},
    quantity::Quantity,
};

/// Actions offered for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderActions {
    pub can_pay: bool,
    pub can_cancel: bool,
}

impl OrderActions {
    /// Only pending orders can be paid or cancelled.
    pub fn for_status(status: &OrderStatus) -> Self {
        let pending = status.is_pending();

        Self {
            can_pay: pending,
            can_cancel: pending,
        }
    }
}

/// Human readable label for a status.
pub fn status_label(status: &OrderStatus) -> &str {
    match status {
        OrderStatus::Pending => "Awaiting payment",
        OrderStatus::Paid => "Paid",
        OrderStatus::Cancelled => "Cancelled",
        OrderStatus::Other(raw) => raw,
    }
}

/// One rendered order line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSummary<'a> {
    pub product_name: &'a str,
    pub quantity: Quantity,
    pub unit_price: Decimal,

    /// `None` when the line overflows.
    pub subtotal: Option<Decimal>,
}

/// Render-ready projection of an [`Order`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary<'a> {
    pub id: OrderId,
    pub status: &'a OrderStatus,
    pub status_label: &'a str,
    pub lines: Vec<LineSummary<'a>>,

    /// The total stored at checkout; never recomputed from current prices.
    pub total: Decimal,
    pub actions: OrderActions,
}

impl<'a> OrderSummary<'a> {
    pub fn project(order: &'a Order) -> Self {
        Self {
            id: order.id,
            status: &order.status,
            status_label: status_label(&order.status),
            lines: order
                .items
                .iter()
                .map(|line| LineSummary {
                    product_name: &line.product_name,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    subtotal: line.subtotal(),
                })
                .collect(),
            total: order.total,
            actions: OrderActions::for_status(&order.status),
        }
    }

    /// True when the stored total disagrees with its own lines.
    pub fn total_mismatch(&self) -> bool {
        let computed = self
            .lines
            .iter()
            .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.subtotal?));

        computed != Some(self.total)
    }
}
