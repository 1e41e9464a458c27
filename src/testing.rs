//! Test helpers for exercising the client without network access.
//!
//! [`recorded_client`] wires a [`Client`] to a [`RecordedTransport`]; seed
//! responses on the transport, make calls, then assert on the request log.
//! [`live_client`] opts a test into real network calls when an API token is
//! present in the environment.

use std::sync::Arc;

use http::StatusCode;

use crate::client::Client;
use crate::transport::{RecordedResponse, RecordedTransport};

/// Environment variable holding the API token for opt-in live tests.
pub const API_TOKEN_ENV: &str = "WANIKANI_API_TOKEN";

/// A client backed by a recorded transport, plus the transport itself for
/// seeding responses and reading the request log.
///
/// The backoff sleep is disabled so retry paths run without wall-clock
/// delay. The transport's queues are scoped to this client instance; use one
/// per test.
pub fn recorded_client() -> (Client, Arc<RecordedTransport>) {
    recorded_client_with(|builder| builder)
}

/// Like [`recorded_client`], with extra builder configuration applied.
///
/// # Examples
///
/// ```
/// use wanikani_api::testing;
///
/// let (client, transport) = testing::recorded_client_with(|b| b.max_retries(2));
/// # let _ = (client, transport);
/// ```
///
/// # Panics
///
/// Panics if `configure` leaves the builder unbuildable; test setup bugs
/// should fail loudly.
pub fn recorded_client_with(
    configure: impl FnOnce(crate::ClientBuilder) -> crate::ClientBuilder,
) -> (Client, Arc<RecordedTransport>) {
    let transport = Arc::new(RecordedTransport::new());
    let builder = Client::builder()
        .api_token("test-token")
        .retry_sleep(false)
        .transport(transport.clone());
    let client = configure(builder).build().expect("recorded client config");
    (client, transport)
}

/// A client against the live API, or `None` when `WANIKANI_API_TOKEN` is not
/// set. Tests that need the network call this and return early on `None`.
pub fn live_client() -> Option<Client> {
    let token = std::env::var(API_TOKEN_ENV).ok()?;
    Client::builder().api_token(token).build().ok()
}

/// A recorded 200 response with the given JSON body.
pub fn ok_response(body: &str) -> RecordedResponse {
    RecordedResponse::new(StatusCode::OK, body)
}

/// A recorded 429 response with the standard rate-limit payload.
pub fn rate_limited_response() -> RecordedResponse {
    RecordedResponse::new(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"code": 429, "error": "You are rate limited"}"#,
    )
}

/// Decodes a percent-encoded query string back to `key=value&...` form for
/// readable assertions.
pub fn decoded_query(query: &str) -> String {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
