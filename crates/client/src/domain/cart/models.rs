//! Cart Models

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::{catalog::models::ProductId, quantity::Quantity},
    ids::TypedId,
    money,
};

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// CartItem Model
///
/// Name and price are denormalised from the product for display. The backend
/// reports a missing price when the product can no longer be found.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Option<Decimal>,
    pub quantity: Quantity,
}

impl CartItem {
    /// Unit price times quantity, when the price is known and the product
    /// fits a [`Decimal`].
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price
            .and_then(|price| money::line_subtotal(price, self.quantity.as_non_zero()))
    }
}

/// New Cart Item, as sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Sum of the known line subtotals. `None` when the sum overflows.
pub fn cart_total(items: &[CartItem]) -> Option<Decimal> {
    money::sum_lines(
        items
            .iter()
            .filter_map(|item| item.price.map(|price| (price, item.quantity.as_non_zero()))),
    )
}
