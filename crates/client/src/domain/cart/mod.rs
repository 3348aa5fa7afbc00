//! Cart

pub mod models;
mod view_model;

pub use view_model::*;
