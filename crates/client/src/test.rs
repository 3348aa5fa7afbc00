//! Shared test fixtures.

use rust_decimal::Decimal;

use crate::{
    api::StorefrontError,
    domain::{
        cart::models::{CartItem, CartItemId},
        catalog::models::{Product, ProductId},
        orders::models::{Order, OrderId, OrderLine, OrderStatus},
        quantity::Quantity,
    },
};

fn quantity(value: u32) -> Quantity {
    Quantity::new(value).unwrap_or_default()
}

pub(crate) fn product(id: u64, name: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Decimal::new(cents, 2),
        description: None,
        image_url: None,
    }
}

pub(crate) fn cart_item(id: u64, name: &str, cents: i64, qty: u32) -> CartItem {
    CartItem {
        id: CartItemId::new(id),
        product_id: ProductId::new(id),
        product_name: name.to_string(),
        price: Some(Decimal::new(cents, 2)),
        quantity: quantity(qty),
    }
}

/// Order whose stored total matches its lines.
pub(crate) fn order(id: u64, status: OrderStatus, lines: &[(&str, i64, u32)]) -> Order {
    let mut order = Order {
        id: OrderId::new(id),
        status,
        items: lines
            .iter()
            .map(|&(name, cents, qty)| OrderLine {
                product_name: name.to_string(),
                quantity: quantity(qty),
                unit_price: Decimal::new(cents, 2),
            })
            .collect(),
        total: Decimal::ZERO,
    };

    order.total = order.computed_total().unwrap_or_default();

    order
}

/// A transport failure carrying a real reqwest error.
///
/// Built from a request whose URL does not parse, so nothing touches the
/// network.
pub(crate) fn network_error() -> StorefrontError {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .err()
        .map_or(
            StorefrontError::Api {
                status: 503,
                message: None,
            },
            StorefrontError::Network,
        )
}
