//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    api::{HttpApiConfig, HttpStorefrontApi, StorefrontApi, StorefrontError},
    domain::{
        cart::CartViewModel,
        catalog::CatalogViewModel,
        orders::{OrdersWorkflow, PaymentViewModel},
    },
    errors::{ActionError, messages},
    navigation::{self, Outcome, Route},
    session::{SessionResolver, models::Credentials},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build storefront http client")]
    Http(#[source] StorefrontError),
}

/// Session-scoped state shared by every screen.
///
/// Created once at startup; per-user view-models are rebuilt whenever the
/// session changes hands.
pub struct AppContext {
    api: Arc<dyn StorefrontApi>,
    route: Route,
    pub session: SessionResolver,
    pub catalog: CatalogViewModel,
    pub cart: CartViewModel,
    pub orders: OrdersWorkflow,
    pub payment: Option<PaymentViewModel>,
}

impl AppContext {
    /// Build an application context talking to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn from_config(config: HttpApiConfig) -> Result<Self, AppInitError> {
        let api = HttpStorefrontApi::new(config).map_err(AppInitError::Http)?;

        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn with_api(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            route: Route::Login,
            session: SessionResolver::new(api.clone()),
            catalog: CatalogViewModel::new(api.clone()),
            cart: CartViewModel::new(api.clone()),
            orders: OrdersWorkflow::new(api.clone()),
            payment: None,
            api,
        }
    }

    /// Resolve the session and land on the first reachable screen.
    pub async fn start(&mut self) -> Route {
        self.session.resolve().await;

        self.navigate(Route::Products)
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Move to `requested`, redirected by the session guard.
    pub fn navigate(&mut self, requested: Route) -> Route {
        let route = navigation::guard(requested, self.session.current());

        if let Route::Payment(order) = route {
            if self.payment.as_ref().map(PaymentViewModel::order_id) != Some(order) {
                self.payment = Some(PaymentViewModel::new(order));
            }
        }

        if route != requested {
            debug!(%requested, %route, "navigation redirected");
        }

        self.route = route;

        route
    }

    /// Navigate to wherever `outcome` leads.
    pub fn follow(&mut self, outcome: Outcome) -> Route {
        if matches!(outcome, Outcome::LoggedIn | Outcome::LoggedOut) {
            self.reset_user_state();
        }

        self.navigate(outcome.next_route())
    }

    /// Check the cart out and move to the payment step for the new order.
    ///
    /// # Errors
    ///
    /// Returns the checkout failure; the route does not change.
    pub async fn checkout(&mut self) -> Result<Route, ActionError> {
        let receipt = self.orders.checkout(&mut self.cart).await?;

        Ok(self.follow(Outcome::CheckedOut(receipt.order_id)))
    }

    /// Pay the order on the payment screen.
    ///
    /// # Errors
    ///
    /// Returns the payment failure, or a validation error when no order is
    /// awaiting payment; the route does not change.
    pub async fn pay(&mut self, card_token: &str) -> Result<Route, ActionError> {
        let Some(payment) = self.payment.as_mut() else {
            return Err(ActionError::validation("pay", messages::NO_ORDER_TO_PAY));
        };

        let order = payment.order_id();

        payment.submit(&mut self.orders, card_token).await?;

        self.payment = None;

        Ok(self.follow(Outcome::Paid(order)))
    }

    /// Log in and go to the product list.
    ///
    /// # Errors
    ///
    /// Returns the login failure; the session and route are unchanged.
    pub async fn login(&mut self, credentials: Credentials) -> Result<Route, ActionError> {
        let outcome = self.session.login(credentials).await?;

        Ok(self.follow(outcome))
    }

    /// Register and go to the login screen.
    ///
    /// # Errors
    ///
    /// Returns the registration failure; the route is unchanged.
    pub async fn register(&mut self, credentials: Credentials) -> Result<Route, ActionError> {
        let outcome = self.session.register(credentials).await?;

        Ok(self.follow(outcome))
    }

    /// Log out and go to the login screen, whatever the backend said.
    pub async fn logout(&mut self) -> Route {
        let outcome = self.session.logout().await;

        self.follow(outcome)
    }

    fn reset_user_state(&mut self) {
        self.catalog = CatalogViewModel::new(self.api.clone());
        self.cart = CartViewModel::new(self.api.clone());
        self.orders = OrdersWorkflow::new(self.api.clone());
        self.payment = None;
    }
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("route", &self.route)
            .field("session", &self.session)
            .field("cart", &self.cart)
            .field("orders", &self.orders)
            .field("payment", &self.payment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        api::MockStorefrontApi,
        domain::orders::models::{CheckoutReceipt, OrderId},
        session::models::{Session, User},
        test::{cart_item, network_error},
    };

    use super::*;

    fn signed_in(api: &mut MockStorefrontApi) {
        api.expect_current_user().once().return_once(|| {
            Ok(Some(User {
                email: "ana@example.com".to_string(),
            }))
        });
    }

    #[tokio::test]
    async fn anonymous_start_lands_on_login() {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user().once().return_once(|| Ok(None));

        let mut app = AppContext::with_api(Arc::new(api));

        assert_eq!(app.start().await, Route::Login);
        assert_eq!(app.navigate(Route::Orders), Route::Login);
        assert_eq!(app.navigate(Route::Register), Route::Register);
    }

    #[tokio::test]
    async fn checkout_then_pay_walks_to_order_list() -> TestResult {
        let mut api = MockStorefrontApi::new();

        signed_in(&mut api);
        api.expect_get_cart()
            .once()
            .return_once(|| Ok(vec![cart_item(1, "Widget", 1000, 2)]));
        api.expect_checkout().once().return_once(|| {
            Ok(CheckoutReceipt {
                order_id: OrderId::new(42),
            })
        });
        api.expect_charge()
            .once()
            .withf(|payment| payment.order_id == OrderId::new(42))
            .return_once(|_| Ok(()));

        let mut app = AppContext::with_api(Arc::new(api));

        assert_eq!(app.start().await, Route::Products);

        app.navigate(Route::Cart);
        app.cart.load().await?;

        assert_eq!(app.checkout().await?, Route::Payment(OrderId::new(42)));
        assert_eq!(app.payment.as_ref().map(PaymentViewModel::order_id), Some(OrderId::new(42)));
        assert_eq!(app.pay("4111111111111111").await?, Route::Orders);
        assert!(app.payment.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn pay_without_pending_order_is_rejected() {
        let mut api = MockStorefrontApi::new();

        api.expect_charge().never();

        let mut app = AppContext::with_api(Arc::new(api));
        let result = app.pay("4111111111111111").await;

        assert!(
            matches!(&result, Err(error) if error.message() == messages::NO_ORDER_TO_PAY),
            "expected validation error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn failed_logout_still_lands_on_login() {
        let mut api = MockStorefrontApi::new();

        signed_in(&mut api);
        api.expect_logout()
            .once()
            .return_once(|| Err(network_error()));

        let mut app = AppContext::with_api(Arc::new(api));

        app.start().await;

        assert_eq!(app.logout().await, Route::Login);
        assert_eq!(app.session.current(), &Session::Anonymous);
        assert_eq!(app.navigate(Route::Cart), Route::Login);
    }
}
