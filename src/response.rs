//! Response decoding.
//!
//! A raw response is classified into exactly one outcome: decoded data, a
//! not-modified marker, a structured API error, or a decode failure. The
//! client never inspects status codes itself; it goes through [`decode`].

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::transport::RawResponse;

/// A decoded API response.
///
/// When a conditional request answers 304, `not_modified` is set and `data`
/// is left at its zero value; check the flag before trusting `data`.
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded payload.
    pub data: T,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// Whether the server answered 304 Not Modified to a conditional
    /// request. `data` is meaningless when this is set.
    pub not_modified: bool,
}

/// Wire shape of an API error payload.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    error: Option<String>,
}

/// Classification of a raw response before it is lifted into a
/// [`Response`] or an [`Error`].
enum Outcome<T> {
    Data(T),
    NotModified,
}

/// Decodes a raw response into a typed [`Response`].
///
/// # Errors
///
/// Non-success statuses other than 304 produce [`Error::Api`]; a malformed
/// success body produces [`Error::Decode`].
pub(crate) fn decode<T>(raw: RawResponse) -> Result<Response<T>>
where
    T: DeserializeOwned + Default,
{
    let outcome = classify(&raw)?;
    Ok(match outcome {
        Outcome::Data(data) => Response {
            data,
            status: raw.status,
            not_modified: false,
        },
        Outcome::NotModified => Response {
            data: T::default(),
            status: raw.status,
            not_modified: true,
        },
    })
}

fn classify<T>(raw: &RawResponse) -> Result<Outcome<T>>
where
    T: DeserializeOwned,
{
    if raw.status == StatusCode::NOT_MODIFIED {
        // The body of a 304 is not the target type; ignore it entirely.
        return Ok(Outcome::NotModified);
    }

    if raw.status.is_success() {
        return match serde_json::from_slice::<T>(&raw.body) {
            Ok(data) => Ok(Outcome::Data(data)),
            Err(e) => {
                let raw_body = String::from_utf8_lossy(&raw.body).into_owned();
                tracing::error!(
                    status = raw.status.as_u16(),
                    error = %e,
                    raw_body = %raw_body,
                    "failed to decode response body"
                );
                Err(Error::Decode {
                    status: raw.status,
                    message: e.to_string(),
                    raw_body,
                })
            }
        };
    }

    // Error statuses carry a {"code": ..., "error": ...} payload. Keep the
    // raw text as the message when the payload doesn't parse, so nothing is
    // swallowed.
    let raw_body = String::from_utf8_lossy(&raw.body).into_owned();
    let parsed: Option<ApiErrorBody> = serde_json::from_slice(&raw.body).ok();
    let (code, message) = match parsed {
        Some(body) => (body.code, body.error.unwrap_or_else(|| raw_body.clone())),
        None => (None, raw_body),
    };

    Err(Error::Api {
        status: raw.status,
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collection, Object};
    use http::HeaderMap;

    fn raw(status: StatusCode, body: &str) -> RawResponse {
        RawResponse {
            status,
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_success_decodes_target() {
        let response: Response<Object> =
            decode(raw(StatusCode::OK, r#"{"id": 123, "object": "kanji"}"#)).unwrap();
        assert_eq!(response.data.id.0, 123);
        assert!(!response.not_modified);
        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn test_empty_object_decodes_to_zero_value() {
        let response: Response<Collection<Object>> = decode(raw(StatusCode::OK, "{}")).unwrap();
        assert!(response.data.data.is_empty());
        assert!(!response.not_modified);
    }

    #[test]
    fn test_not_modified_skips_decoding() {
        // Body content is irrelevant on a 304, even when it isn't valid JSON.
        let response: Response<Collection<Object>> =
            decode(raw(StatusCode::NOT_MODIFIED, "not json at all")).unwrap();
        assert!(response.not_modified);
        assert_eq!(response.data, Collection::default());
    }

    #[test]
    fn test_rate_limit_error_payload() {
        let err = decode::<Object>(raw(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"code": 429, "error": "You are rate limited"}"#,
        ))
        .unwrap_err();
        match err {
            Error::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(code, Some(429));
                assert_eq!(message, "You are rate limited");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_error_body_keeps_raw_text() {
        let err = decode::<Object>(raw(StatusCode::BAD_GATEWAY, "upstream exploded")).unwrap_err();
        match err {
            Error::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(code, None);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_success_body_is_decode_error() {
        let err = decode::<Object>(raw(StatusCode::OK, "not json")).unwrap_err();
        match err {
            Error::Decode {
                status, raw_body, ..
            } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(raw_body, "not json");
            }
            other => panic!("expected Decode error, got {:?}", other),
        }
    }
}
