//! Reqwest-backed storefront adapter.
//!
//! Owns transport details only: URL building, the session cookie jar, status
//! mapping and JSON decoding into domain models.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    api::{
        StorefrontApi, StorefrontError,
        dto::{
            self, CartItemRecord, ChargeBody, CheckoutRecord, OrderRecord, ProductRecord,
            UserRecord,
        },
    },
    domain::{
        cart::models::{CartItem, CartItemId, NewCartItem},
        catalog::models::Product,
        orders::models::{CheckoutReceipt, Order, OrderId, PaymentRequest},
    },
    session::models::{Credentials, User},
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the storefront backend.
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    /// Base URL the REST paths are resolved against, e.g. `http://localhost:5000`.
    pub base_url: Url,

    /// Upper bound on a single request, connect through body.
    pub request_timeout: Duration,
}

impl HttpApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// HTTP client for the storefront REST API.
///
/// The session cookie set by the backend is kept in the client's cookie jar
/// and replayed on every call; its contents are never inspected.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: Url,
    http: Client,
}

impl HttpStorefrontApi {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying reqwest client cannot be built.
    pub fn new(config: HttpApiConfig) -> Result<Self, StorefrontError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(StorefrontError::Client)?;

        Ok(Self {
            base_url: with_trailing_slash(config.base_url),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorefrontError> {
        self.base_url
            .join(path)
            .map_err(|source| StorefrontError::InvalidUrl {
                path: path.to_string(),
                source,
            })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StorefrontError> {
        let url = self.endpoint(path)?;

        Ok(self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json"))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Reply, StorefrontError> {
        let request = request.build().map_err(map_transport_error)?;
        let method = request.method().clone();
        let url = request.url().clone();

        debug!(%method, %url, "sending storefront request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        debug!(%method, %url, status = status.as_u16(), bytes = body.len(), "storefront response");

        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        Ok(Reply {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_products(&self) -> Result<Vec<Product>, StorefrontError> {
        let reply = self.execute(self.request(Method::GET, "products/")?).await?;

        reply
            .json::<Vec<ProductRecord>>()?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    async fn get_cart(&self) -> Result<Vec<CartItem>, StorefrontError> {
        let reply = self.execute(self.request(Method::GET, "cart/")?).await?;

        dto::cart_items(reply.json::<Vec<CartItemRecord>>()?)
    }

    async fn add_to_cart(&self, item: NewCartItem) -> Result<(), StorefrontError> {
        self.execute(self.request(Method::POST, "cart/")?.json(&item))
            .await?;

        Ok(())
    }

    async fn remove_cart_item(&self, item: CartItemId) -> Result<(), StorefrontError> {
        self.execute(self.request(Method::DELETE, &format!("cart/{item}"))?)
            .await?;

        Ok(())
    }

    async fn checkout(&self) -> Result<CheckoutReceipt, StorefrontError> {
        let reply = self.execute(self.request(Method::POST, "checkout/")?).await?;

        Ok(reply.json::<CheckoutRecord>()?.into())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StorefrontError> {
        let reply = self.execute(self.request(Method::GET, "orders/")?).await?;

        reply
            .json::<Vec<OrderRecord>>()?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    async fn cancel_order(&self, order: OrderId) -> Result<(), StorefrontError> {
        self.execute(self.request(Method::DELETE, &format!("orders/{order}"))?)
            .await?;

        Ok(())
    }

    async fn charge(&self, payment: PaymentRequest) -> Result<(), StorefrontError> {
        let body = ChargeBody {
            order_id: payment.order_id,
            card_token: &payment.card_token,
        };

        self.execute(self.request(Method::POST, "payment/charge")?.json(&body))
            .await?;

        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, StorefrontError> {
        user_from_reply(self.execute(self.request(Method::GET, "auth/user")?).await)
    }

    async fn login(&self, credentials: Credentials) -> Result<(), StorefrontError> {
        self.execute(self.request(Method::POST, "auth/login")?.json(&credentials))
            .await?;

        Ok(())
    }

    async fn logout(&self) -> Result<(), StorefrontError> {
        self.execute(self.request(Method::POST, "auth/logout")?)
            .await?;

        Ok(())
    }

    async fn register(&self, credentials: Credentials) -> Result<(), StorefrontError> {
        let reply = self
            .execute(self.request(Method::POST, "auth/register")?.json(&credentials))
            .await?;

        require_created(&reply)
    }
}

#[derive(Debug)]
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

impl Reply {
    fn json<T: DeserializeOwned>(&self) -> Result<T, StorefrontError> {
        serde_json::from_slice(&self.body).map_err(|error| {
            StorefrontError::Decode(format!("{error}; body: {}", body_preview(&self.body)))
        })
    }
}

/// The signed-in user from an `auth/user` reply; a 401 means nobody is.
fn user_from_reply(reply: Result<Reply, StorefrontError>) -> Result<Option<User>, StorefrontError> {
    let reply = match reply {
        Ok(reply) => reply,
        Err(error) if error.is_unauthorized() => return Ok(None),
        Err(error) => return Err(error),
    };

    Ok(reply
        .json::<Option<UserRecord>>()?
        .and_then(UserRecord::into_user))
}

/// Registration only succeeds with 201 Created; any other 2xx is an error.
fn require_created(reply: &Reply) -> Result<(), StorefrontError> {
    if reply.status != StatusCode::CREATED {
        return Err(StorefrontError::Api {
            status: reply.status.as_u16(),
            message: dto::error_message(&reply.body),
        });
    }

    Ok(())
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url
}

fn map_transport_error(error: reqwest::Error) -> StorefrontError {
    StorefrontError::Network(error)
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StorefrontError {
    StorefrontError::Api {
        status: status.as_u16(),
        message: dto::error_message(body),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();

    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use testresult::TestResult;

    use super::*;

    fn api(base: &str) -> TestResult<HttpStorefrontApi> {
        Ok(HttpStorefrontApi::new(HttpApiConfig::new(Url::parse(base)?))?)
    }

    fn reply(status: StatusCode, body: &str) -> Reply {
        Reply {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[rstest]
    #[case::bare_host("http://localhost:5000", "cart/7", "http://localhost:5000/cart/7")]
    #[case::prefixed("http://shop.test/api", "orders/", "http://shop.test/api/orders/")]
    #[case::prefixed_slash("http://shop.test/api/", "payment/charge", "http://shop.test/api/payment/charge")]
    fn endpoints_resolve_under_base_path(
        #[case] base: &str,
        #[case] path: &str,
        #[case] expected: &str,
    ) -> TestResult {
        let url = api(base)?.endpoint(path)?;

        assert_eq!(url.as_str(), expected);

        Ok(())
    }

    #[test]
    fn unresolvable_path_is_not_shown_to_the_user() -> TestResult {
        let error = api("http://localhost:5000")?.endpoint("http://[invalid");

        assert!(
            matches!(&error, Err(StorefrontError::InvalidUrl { path, .. }) if path == "http://[invalid"),
            "unexpected result {error:?}"
        );
        assert_eq!(
            error.err().map(|error| error.user_message("Could not load the cart.")),
            Some("Could not load the cart.".to_string())
        );

        Ok(())
    }

    #[rstest]
    #[case::valid(StatusCode::OK, r#"{"email": "ana@example.com"}"#, Some("ana@example.com"))]
    #[case::null(StatusCode::OK, "null", None)]
    #[case::empty_object(StatusCode::OK, "{}", None)]
    #[case::blank_email(StatusCode::OK, r#"{"email": ""}"#, None)]
    fn user_replies_resolve_the_session(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: Option<&str>,
    ) -> TestResult {
        let user = user_from_reply(Ok(reply(status, body)))?;

        assert_eq!(user.as_ref().map(|user| user.email.as_str()), expected);

        Ok(())
    }

    #[test]
    fn unauthorized_user_lookup_is_anonymous() -> TestResult {
        let error = map_status_error(StatusCode::UNAUTHORIZED, br#"{"error": "login required"}"#);

        assert_eq!(user_from_reply(Err(error))?, None);

        Ok(())
    }

    #[test]
    fn failed_user_lookup_is_an_error() {
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, b"");

        let result = user_from_reply(Err(error));

        assert!(
            matches!(result, Err(StorefrontError::Api { status: 500, .. })),
            "unexpected result {result:?}"
        );
    }

    #[test]
    fn created_registration_succeeds() -> TestResult {
        require_created(&reply(StatusCode::CREATED, r#"{"message": "ok"}"#))?;

        Ok(())
    }

    #[rstest]
    #[case::plain_ok(StatusCode::OK, "", None)]
    #[case::labelled_ok(StatusCode::OK, r#"{"error": "Email already registered"}"#, Some("Email already registered"))]
    #[case::accepted(StatusCode::ACCEPTED, "{}", None)]
    fn registration_needs_created(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: Option<&str>,
    ) {
        let result = require_created(&reply(status, body));

        assert!(
            matches!(
                &result,
                Err(StorefrontError::Api { status: code, message })
                    if *code == status.as_u16() && message.as_deref() == expected
            ),
            "unexpected result {result:?}"
        );
    }

    #[test]
    fn error_status_carries_backend_message() {
        let error = map_status_error(
            StatusCode::BAD_REQUEST,
            br#"{"error": "Dados do usuario ou do carrinho ausentes"}"#,
        );

        assert!(
            matches!(
                &error,
                StorefrontError::Api { status: 400, message: Some(message) }
                    if message == "Dados do usuario ou do carrinho ausentes"
            ),
            "unexpected error {error:?}"
        );
    }

    #[test]
    fn error_status_without_payload_is_unlabelled() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");

        assert!(
            matches!(error, StorefrontError::Api { status: 502, message: None }),
            "unexpected error {error:?}"
        );
    }

    #[test]
    fn decode_failure_includes_body_preview() {
        let reply = Reply {
            status: StatusCode::OK,
            body: b"{\n  \"unexpected\":   true\n}".to_vec(),
        };

        let error = reply.json::<Vec<ProductRecord>>();

        assert!(
            matches!(&error, Err(StorefrontError::Decode(message)) if message.contains("{ \"unexpected\": true }")),
            "unexpected result {error:?}"
        );
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let preview = body_preview("x".repeat(500).as_bytes());

        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }
}
