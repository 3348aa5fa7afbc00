//! Backend REST API access.

mod dto;
mod errors;
mod http;
mod service;

pub use errors::StorefrontError;
pub use http::{HttpApiConfig, HttpStorefrontApi};
pub use service::*;
