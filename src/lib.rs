//! # wanikani-api - a typed client for the WaniKani v2 REST API
//!
//! An async, type-safe client built on top of `reqwest`. It serializes and
//! deserializes JSON payloads into typed structures, handles conditional
//! requests (`If-Modified-Since`/`If-None-Match`), retries rate-limited
//! calls with exponential backoff, and drives cursor pagination uniformly
//! across every list endpoint.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wanikani_api::{Client, SubjectListParams};
//!
//! #[tokio::main]
//! async fn main() -> wanikani_api::Result<()> {
//!     let client = Client::builder()
//!         .api_token(std::env::var("WANIKANI_API_TOKEN").unwrap())
//!         .max_retries(2)
//!         .build()?;
//!
//!     let subjects = client
//!         .subject_list(&SubjectListParams {
//!             levels: Some(vec![1, 2, 3]),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     for subject in &subjects.data.data {
//!         println!("{}: {:?}", subject.object.id, subject.data);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Conditional requests
//!
//! Pass an `If-Modified-Since` time or `If-None-Match` ETag in
//! [`Params`]; a 304 answer sets `not_modified` on the response instead of
//! decoding data, so check the flag before using it:
//!
//! ```no_run
//! use wanikani_api::{Client, Params, SubjectListParams, Timestamp};
//!
//! # async fn example(client: &Client) -> wanikani_api::Result<()> {
//! let subjects = client
//!     .subject_list(&SubjectListParams {
//!         params: Params {
//!             if_modified_since: Some(Timestamp::now()),
//!             ..Default::default()
//!         },
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! if subjects.not_modified {
//!     println!("nothing changed since last fetch");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pagination
//!
//! [`Client::page_fully`] walks every page of a collection by following the
//! server-provided `next_url` cursor; the caller's closure accumulates
//! items.
//!
//! ## Testing
//!
//! The [`testing`] module builds clients over a
//! [`RecordedTransport`](transport::RecordedTransport) that replays seeded
//! responses and logs outgoing requests, so pipeline behavior can be
//! asserted without network access.

mod client;
mod error;
mod query;
mod response;
mod retry;
pub mod testing;
pub mod transport;
mod types;

mod review_statistic;
mod subject;
mod user;
mod voice_actor;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use query::Query;
pub use response::Response;
pub use types::{
    Collection, Id, ListParams, Object, ObjectType, PageObject, Params, Timestamp,
};

pub use review_statistic::{
    ReviewStatistic, ReviewStatisticData, ReviewStatisticGetParams, ReviewStatisticListParams,
};
pub use subject::{
    Subject, SubjectAuxiliaryMeaning, SubjectData, SubjectGetParams, SubjectListParams,
    SubjectMeaning,
};
pub use user::{
    User, UserData, UserGetParams, UserPreferences, UserSubscription, UserUpdateParams,
    UserUpdatePreferencesParams,
};
pub use voice_actor::{
    VoiceActor, VoiceActorData, VoiceActorGetParams, VoiceActorListParams,
};
