//! Orders
//!
//! Checkout, order history, cancellation and payment, plus the projection
//! that decides what each order offers.

pub mod models;
mod payment;
pub mod status;
mod workflow;

pub use payment::PaymentViewModel;
pub use workflow::*;
