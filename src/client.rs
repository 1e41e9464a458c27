//! API client with retry logic and cursor pagination.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure and create clients; resource methods like
//! [`subject_list`](Client::subject_list) live in their own modules and
//! delegate here.

use std::future::Future;
use std::sync::Arc;

use http::header::{AUTHORIZATION, CONTENT_TYPE, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use http::{HeaderMap, HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};
use crate::query::Query;
use crate::response::{self, Response};
use crate::retry;
use crate::transport::{HttpRequest, HttpTransport, Transport};
use crate::types::{Id, PageObject, Params};

/// Default base URL of the API.
pub const DEFAULT_BASE_URL: &str = "https://api.wanikani.com";

/// An API client.
///
/// The client is cheap to clone and designed to be reused: it holds
/// configuration and a pooled transport, no per-call state. One logical call
/// runs builder, transport, retry loop, and decoder sequentially; separate
/// calls may run concurrently on the same client.
///
/// # Examples
///
/// ```no_run
/// use wanikani_api::{Client, SubjectListParams};
///
/// # async fn example() -> wanikani_api::Result<()> {
/// let client = Client::builder()
///     .api_token("wk-token")
///     .max_retries(2)
///     .build()?;
///
/// let subjects = client
///     .subject_list(&SubjectListParams {
///         levels: Some(vec![1, 2, 3]),
///         ..Default::default()
///     })
///     .await?;
/// println!("got {} subjects", subjects.data.data.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("max_retries", &self.inner.max_retries)
            .field("retry_sleep", &self.inner.retry_sleep)
            .finish_non_exhaustive()
    }
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    base_url: Url,
    api_token: String,
    max_retries: u32,
    retry_sleep: bool,
}

impl Client {
    /// Creates a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Makes a typed API request.
    ///
    /// This is the single entry point the resource modules delegate to. It
    /// builds the request, sends it through the transport with the retry
    /// loop around it, and decodes the result into `T`.
    ///
    /// A 429 answer is resent up to the configured maximum, sleeping an
    /// exponential backoff between attempts (skipped when `retry_sleep` is
    /// off); when the budget runs out, the error from the last attempt is
    /// returned. No other error is ever retried.
    ///
    /// When `params.timeout` is set it bounds the whole call: every attempt
    /// and every backoff sleep between attempts count against the one
    /// budget. Expiry returns [`Error::Cancelled`] and is never retried.
    ///
    /// # Errors
    ///
    /// See [`Error`] for the full taxonomy; every failure of the underlying
    /// layers is propagated unchanged.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: Query,
        params: &Params,
        body: Option<&B>,
    ) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let req = self.build_http_request(method, path, query, params, body)?;

        match params.timeout {
            Some(timeout) => {
                let deadline = tokio::time::Instant::now() + timeout;
                match tokio::time::timeout_at(deadline, self.send_with_retries(req, Some(deadline)))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(Error::Cancelled),
                }
            }
            None => self.send_with_retries(req, None).await,
        }
    }

    /// Runs the attempt/backoff loop. The caller enforces the deadline with
    /// a surrounding timer; the check here covers transports that complete
    /// without ever yielding, which the timer alone cannot interrupt.
    async fn send_with_retries<T>(
        &self,
        req: HttpRequest,
        deadline: Option<tokio::time::Instant>,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned + Default,
    {
        let mut attempt: u32 = 0;
        loop {
            if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                return Err(Error::Cancelled);
            }

            attempt += 1;

            tracing::debug!(
                method = %req.method,
                url = %req.url,
                attempt = attempt,
                "sending API request"
            );

            let result = match self.inner.transport.send(req.clone()).await {
                Ok(raw) => response::decode(raw),
                Err(e) => Err(e),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if !e.is_rate_limited() || attempt > self.inner.max_retries {
                        return Err(e);
                    }

                    tracing::warn!(
                        attempt = attempt,
                        max_retries = self.inner.max_retries,
                        "rate limited, retrying"
                    );
                    if self.inner.retry_sleep {
                        tokio::time::sleep(retry::backoff_delay(attempt)).await;
                    }
                }
            }
        }
    }

    /// Fetches every page of a paginated collection.
    ///
    /// Calls `fetch` with `None` for the first page, then follows the
    /// `page_after_id` cursor extracted from each page's `next_url` until a
    /// page has no next URL. The closure owns accumulation of items; this
    /// driver only carries cursors. Returning `Ok(None)` from the closure
    /// stops pagination early, and any error aborts immediately and is
    /// returned unchanged.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::cell::RefCell;
    /// use wanikani_api::{Client, ListParams, Subject, SubjectListParams};
    ///
    /// # async fn example(client: &Client) -> wanikani_api::Result<()> {
    /// let subjects = RefCell::new(Vec::<Subject>::new());
    /// let subjects = &subjects;
    /// client
    ///     .page_fully(|cursor| async move {
    ///         let page = client
    ///             .subject_list(&SubjectListParams {
    ///                 list: ListParams {
    ///                     page_after_id: cursor,
    ///                     ..Default::default()
    ///                 },
    ///                 ..Default::default()
    ///             })
    ///             .await?;
    ///         subjects.borrow_mut().extend(page.data.data);
    ///         Ok(Some(page.data.pages))
    ///     })
    ///     .await?;
    /// println!("paged {} subjects", subjects.borrow().len());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Any error from `fetch`, plus [`Error::Pagination`] when a `next_url`
    /// carries no parseable cursor.
    pub async fn page_fully<F, Fut>(&self, mut fetch: F) -> Result<()>
    where
        F: FnMut(Option<Id>) -> Fut,
        Fut: Future<Output = Result<Option<PageObject>>>,
    {
        let mut cursor: Option<Id> = None;
        loop {
            let Some(page) = fetch(cursor).await? else {
                return Ok(());
            };
            let Some(next) = page.next_page_cursor()? else {
                return Ok(());
            };
            cursor = Some(next);
        }
    }

    fn build_http_request<B>(
        &self,
        method: Method,
        path: &str,
        query: Query,
        params: &Params,
        body: Option<&B>,
    ) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let mut url = self.inner.base_url.join(path)?;
        query.apply(&mut url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.inner.api_token))
                .map_err(|e| Error::Config(format!("invalid API token: {}", e)))?,
        );
        if let Some(ts) = params.if_modified_since {
            headers.insert(
                IF_MODIFIED_SINCE,
                HeaderValue::from_str(&httpdate::fmt_http_date(ts.into()))
                    .map_err(|e| Error::Config(format!("invalid If-Modified-Since: {}", e)))?,
            );
        }
        if let Some(etag) = &params.if_none_match {
            headers.insert(
                IF_NONE_MATCH,
                HeaderValue::from_str(etag)
                    .map_err(|e| Error::Config(format!("invalid If-None-Match: {}", e)))?,
            );
        }

        let body = match body {
            Some(b) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(serde_json::to_vec(b).map_err(|e| Error::Serialize(e.to_string()))?)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: params.timeout,
        })
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use wanikani_api::ClientBuilder;
///
/// # fn example() -> wanikani_api::Result<()> {
/// let client = ClientBuilder::new()
///     .api_token("wk-token")
///     .max_retries(3)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_token: Option<String>,
    base_url: Option<Url>,
    transport: Option<Arc<dyn Transport>>,
    max_retries: u32,
    retry_sleep: bool,
}

impl ClientBuilder {
    /// Creates a builder with default settings: no retries on rate limits,
    /// backoff sleeps enabled, live transport, production base URL.
    pub fn new() -> Self {
        Self {
            api_token: None,
            base_url: None,
            transport: None,
            max_retries: 0,
            retry_sleep: true,
        }
    }

    /// Sets the bearer token used to authorize every request. Required.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Overrides the base URL, e.g. to point at a local mock server.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Injects a transport, replacing the live HTTP one. Used by tests to
    /// install a [`RecordedTransport`](crate::transport::RecordedTransport).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets how many times a rate-limited call is resent before the 429 is
    /// surfaced. Defaults to 0: the first 429 is returned immediately.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Toggles the backoff sleep between retries. Tests turn this off to
    /// exercise the retry loop without wall-clock delay.
    pub fn retry_sleep(mut self, retry_sleep: bool) -> Self {
        self.retry_sleep = retry_sleep;
        self
    }

    /// Builds the configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no API token was provided.
    pub fn build(self) -> Result<Client> {
        let api_token = self
            .api_token
            .ok_or_else(|| Error::Config("API token is required".to_string()))?;

        let base_url = match self.base_url {
            Some(url) => url,
            // DEFAULT_BASE_URL is statically valid.
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::new()));

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
                api_token,
                max_retries: self.max_retries,
                retry_sleep: self.retry_sleep,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
