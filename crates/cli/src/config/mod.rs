//! Terminal client configuration

use clap::Parser;

use crate::config::{api::ApiConfig, observability::LoggingConfig};

pub(crate) mod api;
pub(crate) mod observability;

pub(crate) use observability::LogFormat;

/// Storefront terminal client configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront terminal client", long_about = None)]
pub struct CliConfig {
    /// Backend connection settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
