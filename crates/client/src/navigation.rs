//! Navigation glue between workflow outcomes and screens.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{domain::orders::models::OrderId, session::models::Session};

/// A screen of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Products,
    Cart,
    Checkout,
    Payment(OrderId),
    Orders,
    Login,
    Register,
}

impl Route {
    /// Parse a path such as `/payment/42`. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_matches('/');
        let mut segments = trimmed.split('/');

        let route = match (segments.next(), segments.next()) {
            (Some(""), None) => Self::Products,
            (Some("cart"), None) => Self::Cart,
            (Some("checkout"), None) => Self::Checkout,
            (Some("orders"), None) => Self::Orders,
            (Some("login"), None) => Self::Login,
            (Some("register"), None) => Self::Register,
            (Some("payment"), Some(id)) => Self::Payment(id.parse().ok()?),
            _ => return None,
        };

        segments.next().is_none().then_some(route)
    }

    /// Screens an anonymous visitor may see.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Products => f.write_str("/"),
            Self::Cart => f.write_str("/cart"),
            Self::Checkout => f.write_str("/checkout"),
            Self::Payment(order) => write!(f, "/payment/{order}"),
            Self::Orders => f.write_str("/orders"),
            Self::Login => f.write_str("/login"),
            Self::Register => f.write_str("/register"),
        }
    }
}

/// Terminal result of a workflow step that moves the user elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    CheckedOut(OrderId),
    Paid(OrderId),
    LoggedIn,
    LoggedOut,
    Registered,
}

impl Outcome {
    /// Screen to show after this outcome.
    pub fn next_route(self) -> Route {
        match self {
            Self::CheckedOut(order) => Route::Payment(order),
            Self::Paid(_) => Route::Orders,
            Self::LoggedIn => Route::Products,
            Self::LoggedOut | Self::Registered => Route::Login,
        }
    }
}

/// Redirect `requested` according to who is logged in.
///
/// Anonymous sessions only reach login and registration; signed-in users
/// asking for those are sent to the product list instead.
pub fn guard(requested: Route, session: &Session) -> Route {
    match (session.is_authenticated(), requested.is_public()) {
        (false, false) => Route::Login,
        (true, true) => Route::Products,
        _ => requested,
    }
}
