//! Storefront API port.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::StorefrontError,
    domain::{
        cart::models::{CartItem, CartItemId, NewCartItem},
        catalog::models::Product,
        orders::models::{CheckoutReceipt, Order, OrderId, PaymentRequest},
    },
    session::models::{Credentials, User},
};

/// Backend REST operations consumed by the storefront.
///
/// Every call is a single attempt; retrying is left to the user.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /products/`
    async fn list_products(&self) -> Result<Vec<Product>, StorefrontError>;

    /// `GET /cart/`
    async fn get_cart(&self) -> Result<Vec<CartItem>, StorefrontError>;

    /// `POST /cart/`
    async fn add_to_cart(&self, item: NewCartItem) -> Result<(), StorefrontError>;

    /// `DELETE /cart/{item}`
    async fn remove_cart_item(&self, item: CartItemId) -> Result<(), StorefrontError>;

    /// `POST /checkout/` with no body; the cart is resolved from the session.
    async fn checkout(&self) -> Result<CheckoutReceipt, StorefrontError>;

    /// `GET /orders/`, items and status already materialised.
    async fn list_orders(&self) -> Result<Vec<Order>, StorefrontError>;

    /// `DELETE /orders/{order}`
    async fn cancel_order(&self, order: OrderId) -> Result<(), StorefrontError>;

    /// `POST /payment/charge`
    async fn charge(&self, payment: PaymentRequest) -> Result<(), StorefrontError>;

    /// `GET /auth/user`. `Ok(None)` means nobody is logged in.
    async fn current_user(&self) -> Result<Option<User>, StorefrontError>;

    /// `POST /auth/login`
    async fn login(&self, credentials: Credentials) -> Result<(), StorefrontError>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<(), StorefrontError>;

    /// `POST /auth/register`
    async fn register(&self, credentials: Credentials) -> Result<(), StorefrontError>;
}
