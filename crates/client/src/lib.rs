//! Storefront Client
//!
//! Typed client and presentation state for a storefront backend: product
//! catalog, cart, checkout, payment, order history and the login session.
//! Rendering is left to the embedding application.

pub mod api;
pub mod context;
pub mod domain;
pub mod errors;
pub mod ids;
pub mod loadable;
pub mod money;
pub mod navigation;
pub mod session;

#[cfg(test)]
mod test;
