//! Error types for API calls.
//!
//! Every fallible operation in this crate returns [`Error`]. Server-reported
//! failures keep their decoded payload (`{"code": ..., "error": ...}`) so
//! callers can branch on the status code and show the server's message.

use http::StatusCode;

/// The main error type for WaniKani API calls.
///
/// # Examples
///
/// ```no_run
/// use wanikani_api::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().api_token("wk-token").build()?;
///
/// match client.user_get(&Default::default()).await {
///     Ok(user) => println!("user: {:?}", user.data),
///     Err(Error::Api { status, message, .. }) => {
///         eprintln!("API error {}: {}", status, message);
///     }
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed,
    /// etc.). This indicates a problem below the HTTP protocol layer and is
    /// never retried.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The call's timeout expired or it was otherwise cancelled while in
    /// flight. Never retried.
    #[error("request cancelled or timed out")]
    Cancelled,

    /// The server returned a structured error payload.
    ///
    /// The message is taken from the `error` field of the payload when the
    /// body parses as `{"code": <int>, "error": "<string>"}`, and falls back
    /// to the raw body text otherwise. Only a 429 is eligible for retry.
    #[error("API error {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: StatusCode,
        /// The machine-readable code from the error payload, when present.
        code: Option<i64>,
        /// The human-readable message.
        message: String,
    },

    /// A success-status body failed to decode into the expected type.
    ///
    /// Retrying will not fix a malformed payload, so this is surfaced
    /// immediately with the raw body preserved for debugging.
    #[error("failed to decode response (status {status}): {message}")]
    Decode {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The serde error message.
        message: String,
        /// The raw response body that failed to decode.
        raw_body: String,
    },

    /// Failed to serialize the request body to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(String),

    /// A `next_url` returned by the server carried no parseable
    /// `page_after_id` cursor, so pagination cannot continue.
    #[error("no pagination cursor found in next page URL: {next_url}")]
    Pagination {
        /// The URL the cursor could not be extracted from.
        next_url: String,
    },

    /// The recorded transport's response queue is empty.
    ///
    /// Only produced by [`RecordedTransport`](crate::transport::RecordedTransport);
    /// it means a test issued more requests than it seeded responses for.
    #[error("no more recorded responses")]
    NoRecordedResponses,

    /// Invalid client or request configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An invalid URL was provided.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error is a server-side rate limit (HTTP 429).
    ///
    /// This is the only error the client will retry, and only when a retry
    /// budget was configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use wanikani_api::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::TOO_MANY_REQUESTS,
    ///     code: Some(429),
    ///     message: "You are rate limited".to_string(),
    /// };
    /// assert!(err.is_rate_limited());
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::NOT_FOUND,
    ///     code: None,
    ///     message: "Not found".to_string(),
    /// };
    /// assert!(!err.is_rate_limited());
    /// ```
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Error::Api { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;
