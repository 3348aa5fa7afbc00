//! Storefront API errors.

use thiserror::Error;

/// Failure of a single backend interaction.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The HTTP client could not be built.
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),

    /// A request path could not be resolved against the base URL.
    #[error("invalid request url for {path}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// No usable response: connection, timeout or body transfer failure.
    #[error("network error")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("api error (status {status})")]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The backend answered successfully but the body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// A client-side precondition failed before any request was made.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl StorefrontError {
    /// Backend-supplied human readable message, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// The message shown to the user: validation text and labelled API errors
    /// verbatim, `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Api { message: None, .. }
            | Self::Client(_)
            | Self::InvalidUrl { .. }
            | Self::Network(_)
            | Self::Decode(_) => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}
