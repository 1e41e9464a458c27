//! HTTP transport abstraction.
//!
//! The client talks to the network through the [`Transport`] trait so tests
//! can swap the live [`HttpTransport`] for a [`RecordedTransport`] that
//! replays pre-seeded responses and logs every outgoing request.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::{Error, Result};

/// A fully-built HTTP request, ready to send.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: Method,
    /// Absolute URL including any encoded query string.
    pub url: Url,
    /// Headers, including authorization and any conditional-request headers.
    pub headers: HeaderMap,
    /// Serialized JSON body. `None` sends a zero-length body, which is
    /// distinct from an explicit empty JSON object.
    pub body: Option<Vec<u8>>,
    /// Per-call timeout. Expiry surfaces as [`Error::Cancelled`].
    pub timeout: Option<Duration>,
}

/// A raw HTTP response before decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The raw body bytes.
    pub body: Vec<u8>,
}

/// Sends a single HTTP request and returns the raw response.
///
/// Implementations must be safe for concurrent use; the live transport is,
/// while [`RecordedTransport`] serializes access to its queues internally but
/// expects one test at a time per instance since replay order is what tests
/// assert on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `req` and returns the status, headers, and body.
    ///
    /// # Errors
    ///
    /// Network-level failures map to [`Error::Network`], timeouts to
    /// [`Error::Cancelled`]. Non-2xx statuses are not errors at this layer;
    /// the decoder classifies them.
    async fn send(&self, req: HttpRequest) -> Result<RawResponse>;
}

/// Live transport over a pooled [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<RawResponse> {
        let mut request = self
            .http
            .request(req.method, req.url)
            .headers(req.headers);

        if let Some(timeout) = req.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = req.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Cancelled
            } else {
                Error::Network(e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::Cancelled
            } else {
                Error::Network(e)
            }
        })?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// A pre-seeded response for the recorded transport, consumed in FIFO order.
#[derive(Debug, Clone)]
pub struct RecordedResponse {
    /// The status code to return.
    pub status: StatusCode,
    /// The raw body to return.
    pub body: Vec<u8>,
}

impl RecordedResponse {
    /// A recorded response with the given status and body.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request captured by the recorded transport, in issuance order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// The HTTP method.
    pub method: Method,
    /// The URL path, without query string.
    pub path: String,
    /// The encoded query string, empty when the URL had none.
    pub query: String,
    /// The request body, empty when no body was sent.
    pub body: Vec<u8>,
}

#[derive(Debug, Default)]
struct RecordedState {
    responses: VecDeque<RecordedResponse>,
    requests: Vec<RecordedRequest>,
}

/// Replay transport for deterministic tests.
///
/// Responses are seeded up front and handed out in order; every outgoing
/// request is logged before its response is popped, so retry and pagination
/// tests can assert exact request sequences. State is owned by the instance,
/// never global, so independent test clients cannot interfere.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use wanikani_api::transport::{RecordedResponse, RecordedTransport};
///
/// let transport = RecordedTransport::new();
/// transport.seed(vec![RecordedResponse::new(StatusCode::OK, "{}")]);
/// ```
#[derive(Debug, Default)]
pub struct RecordedTransport {
    state: Mutex<RecordedState>,
}

impl RecordedTransport {
    /// Creates a transport with no seeded responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends responses to the replay queue.
    pub fn seed(&self, responses: impl IntoIterator<Item = RecordedResponse>) {
        self.lock_state().responses.extend(responses);
    }

    /// Returns a copy of every request issued so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock_state().requests.clone()
    }

    /// Clears both the replay queue and the request log.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.responses.clear();
        state.requests.clear();
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RecordedState> {
        // A poisoned lock means a previous test already panicked; the state
        // is plain data, so keep going with it.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for RecordedTransport {
    async fn send(&self, req: HttpRequest) -> Result<RawResponse> {
        let mut state = self.lock_state();

        state.requests.push(RecordedRequest {
            method: req.method,
            path: req.url.path().to_string(),
            query: req.url.query().unwrap_or("").to_string(),
            body: req.body.unwrap_or_default(),
        });

        let response = state
            .responses
            .pop_front()
            .ok_or(Error::NoRecordedResponses)?;

        Ok(RawResponse {
            status: response.status,
            headers: HeaderMap::new(),
            body: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: Method::GET,
            url: Url::parse(url).unwrap(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_recorded_responses_consumed_in_order() {
        let transport = RecordedTransport::new();
        transport.seed(vec![
            RecordedResponse::new(StatusCode::TOO_MANY_REQUESTS, "first"),
            RecordedResponse::new(StatusCode::OK, "second"),
        ]);

        let first = transport
            .send(request("https://api.wanikani.com/v2/subjects"))
            .await
            .unwrap();
        assert_eq!(first.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(first.body, b"first");

        let second = transport
            .send(request("https://api.wanikani.com/v2/subjects"))
            .await
            .unwrap();
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(second.body, b"second");
    }

    #[tokio::test]
    async fn test_exhausted_queue_is_an_error() {
        let transport = RecordedTransport::new();
        let err = transport
            .send(request("https://api.wanikani.com/v2/user"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoRecordedResponses));

        // The request is still logged even when no response was available.
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_requests_logged_with_path_and_query() {
        let transport = RecordedTransport::new();
        transport.seed(vec![RecordedResponse::new(StatusCode::OK, "{}")]);

        transport
            .send(request("https://api.wanikani.com/v2/subjects?hidden=true"))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].path, "/v2/subjects");
        assert_eq!(requests[0].query, "hidden=true");
        assert!(requests[0].body.is_empty());
    }
}
