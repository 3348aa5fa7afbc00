//! Session

pub mod models;
mod resolver;

pub use resolver::SessionResolver;
