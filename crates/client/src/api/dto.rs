//! Wire records exchanged with the backend.
//!
//! Records mirror the JSON the services emit and are converted into domain
//! models here, so nothing outside the adapter sees a raw payload.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    api::StorefrontError,
    domain::{
        cart::models::{CartItem, CartItemId, cart_total},
        catalog::models::{Product, ProductId},
        orders::models::{CheckoutReceipt, Order, OrderId, OrderLine, OrderStatus},
        quantity::Quantity,
    },
    money,
    session::models::User,
};

const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

#[derive(Debug, Deserialize)]
pub(super) struct ProductRecord {
    id: ProductId,
    name: String,
    price: Decimal,
    description: Option<String>,
    image_url: Option<String>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = StorefrontError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        non_negative(record.price, || format!("product {}", record.id))?;

        Ok(Self {
            id: record.id,
            name: record.name,
            price: record.price,
            description: record.description,
            image_url: record.image_url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CartItemRecord {
    id: CartItemId,
    product_id: ProductId,
    product_name: Option<String>,
    price: Option<Decimal>,
    quantity: Quantity,
}

impl TryFrom<CartItemRecord> for CartItem {
    type Error = StorefrontError;

    fn try_from(record: CartItemRecord) -> Result<Self, Self::Error> {
        let describe = || format!("cart item {}", record.id);

        if let Some(price) = record.price {
            non_negative(price, describe)?;
            fits(money::line_subtotal(price, record.quantity.as_non_zero()), describe)?;
        }

        Ok(Self {
            id: record.id,
            product_id: record.product_id,
            product_name: record
                .product_name
                .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
            price: record.price,
            quantity: record.quantity,
        })
    }
}

/// Decode a whole cart, rejecting one whose total cannot be represented.
pub(super) fn cart_items(records: Vec<CartItemRecord>) -> Result<Vec<CartItem>, StorefrontError> {
    let items = records
        .into_iter()
        .map(CartItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    fits(cart_total(&items), || "cart".to_string())?;

    Ok(items)
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderRecord {
    id: OrderId,
    status: Option<String>,
    #[serde(default)]
    items: Vec<OrderLineRecord>,
    total: Decimal,
}

// The orders table stores quantities as floats, so `2.0` is accepted.
#[derive(Debug, Deserialize)]
pub(super) struct OrderLineRecord {
    product_name: Option<String>,
    quantity: Decimal,
    price: Decimal,
}

impl TryFrom<OrderRecord> for Order {
    type Error = StorefrontError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let describe = || format!("order {}", record.id);
        let items = record
            .items
            .into_iter()
            .map(|line| {
                let quantity = whole_quantity(line.quantity).ok_or_else(|| {
                    StorefrontError::Decode(format!(
                        "order {} has an invalid line quantity {}",
                        record.id, line.quantity
                    ))
                })?;

                non_negative(line.price, describe)?;

                Ok(OrderLine {
                    product_name: line
                        .product_name
                        .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
                    quantity,
                    unit_price: line.price,
                })
            })
            .collect::<Result<Vec<_>, StorefrontError>>()?;

        let order = Self {
            id: record.id,
            status: record
                .status
                .as_deref()
                .map(OrderStatus::parse)
                .unwrap_or_default(),
            items,
            total: record.total,
        };

        fits(order.computed_total(), describe)?;

        Ok(order)
    }
}

fn non_negative(price: Decimal, describe: impl FnOnce() -> String) -> Result<(), StorefrontError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(StorefrontError::Decode(format!(
            "{} has a negative price",
            describe()
        )));
    }

    Ok(())
}

fn fits(amount: Option<Decimal>, describe: impl FnOnce() -> String) -> Result<(), StorefrontError> {
    match amount {
        Some(_) => Ok(()),
        None => Err(StorefrontError::Decode(format!(
            "{} has amounts too large to total",
            describe()
        ))),
    }
}

fn whole_quantity(raw: Decimal) -> Option<Quantity> {
    if !raw.fract().is_zero() {
        return None;
    }

    raw.to_u32().and_then(Quantity::new)
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutRecord {
    order_id: OrderId,
}

impl From<CheckoutRecord> for CheckoutReceipt {
    fn from(record: CheckoutRecord) -> Self {
        Self {
            order_id: record.order_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserRecord {
    email: Option<String>,
}

impl UserRecord {
    pub(super) fn into_user(self) -> Option<User> {
        self.email
            .filter(|email| !email.trim().is_empty())
            .map(|email| User { email })
    }
}

#[derive(Serialize)]
pub(super) struct ChargeBody<'a> {
    pub(super) order_id: OrderId,
    pub(super) card_token: &'a str,
}

impl Debug for ChargeBody<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ChargeBody")
            .field("order_id", &self.order_id)
            .field("card_token", &"<redacted>")
            .finish()
    }
}

/// Pull a human readable message out of an error body.
///
/// Some services answer `{"error": ...}`, others `{"detail": ...}`.
pub(super) fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    ["error", "detail"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
