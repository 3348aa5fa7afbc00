//! Backend Connection Config

use std::time::Duration;

use clap::Args;
use storefront_client::{
    api::HttpApiConfig,
    money::{DEFAULT_CURRENCY, MoneyFormat},
};
use url::Url;

/// Backend connection and display settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Storefront backend base URL
    #[arg(long, env = "STOREFRONT_API_URL", default_value = "http://localhost:5000")]
    pub api_url: Url,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "STOREFRONT_REQUEST_TIMEOUT_MS", default_value_t = 10_000_u64)]
    pub request_timeout_ms: u64,

    /// ISO 4217 currency used to display prices
    #[arg(
        long,
        env = "STOREFRONT_CURRENCY",
        default_value = DEFAULT_CURRENCY,
        value_parser = parse_currency
    )]
    pub currency: MoneyFormat,
}

impl ApiConfig {
    /// HTTP adapter settings derived from the flags.
    pub fn http(&self) -> HttpApiConfig {
        HttpApiConfig {
            base_url: self.api_url.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

fn parse_currency(raw: &str) -> Result<MoneyFormat, String> {
    MoneyFormat::for_code(raw).ok_or_else(|| format!("unknown currency code `{raw}`"))
}
