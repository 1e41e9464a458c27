//! Common data types shared by every API resource.
//!
//! Every concrete resource embeds [`Object`] for its identity fields, and
//! every list endpoint returns a [`Collection`] carrying the pagination
//! envelope in [`PageObject`].

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::query::Query;

/// Numeric identifier of an API resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id(pub u64);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for Id {
    fn from(id: u64) -> Self {
        Id(id)
    }
}

/// A point in time, serialized as an RFC 3339 string on the wire.
///
/// # Examples
///
/// ```
/// use wanikani_api::Timestamp;
///
/// let ts: Timestamp = serde_json::from_str(r#""2023-02-04T01:00:00Z""#).unwrap();
/// assert_eq!(serde_json::to_string(&ts).unwrap(), r#""2023-02-04T01:00:00Z""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    /// The current time in UTC.
    pub fn now() -> Self {
        Timestamp(OffsetDateTime::now_utc())
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(t: OffsetDateTime) -> Self {
        Timestamp(t)
    }
}

impl From<Timestamp> for SystemTime {
    fn from(t: Timestamp) -> Self {
        t.0.into()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        time::serde::rfc3339::deserialize(deserializer).map(Timestamp)
    }
}

/// The `object` type tag carried by every API resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Assignment,
    Collection,
    KanaVocabulary,
    Kanji,
    LevelProgression,
    Radical,
    Report,
    Reset,
    Review,
    ReviewStatistic,
    SpacedRepetitionSystem,
    StudyMaterial,
    Summary,
    User,
    Vocabulary,
    VoiceActor,
    /// A type tag this client version does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ObjectType {
    /// The snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Assignment => "assignment",
            ObjectType::Collection => "collection",
            ObjectType::KanaVocabulary => "kana_vocabulary",
            ObjectType::Kanji => "kanji",
            ObjectType::LevelProgression => "level_progression",
            ObjectType::Radical => "radical",
            ObjectType::Report => "report",
            ObjectType::Reset => "reset",
            ObjectType::Review => "review",
            ObjectType::ReviewStatistic => "review_statistic",
            ObjectType::SpacedRepetitionSystem => "spaced_repetition_system",
            ObjectType::StudyMaterial => "study_material",
            ObjectType::Summary => "summary",
            ObjectType::User => "user",
            ObjectType::Vocabulary => "vocabulary",
            ObjectType::VoiceActor => "voice_actor",
            ObjectType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base identity fields shared by every API resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Object {
    /// Numeric ID of the resource. Zero for singleton resources like the
    /// user, which have no ID of their own.
    pub id: Id,

    /// The resource's type tag.
    #[serde(rename = "object")]
    pub object_type: ObjectType,

    /// Canonical URL of the resource.
    pub url: Option<String>,

    /// When the resource's data was last changed server-side.
    pub data_updated_at: Option<Timestamp>,
}

/// Pagination envelope embedded in every list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageObject {
    /// Number of items the server returns per page.
    pub per_page: i64,

    /// URL of the next page. Absent on the last page.
    pub next_url: Option<String>,

    /// URL of the previous page. Absent on the first page.
    pub previous_url: Option<String>,
}

impl PageObject {
    /// Extracts the opaque `page_after_id` cursor from `next_url`.
    ///
    /// Returns `Ok(None)` when there is no next page. The cursor is an
    /// ordinary query parameter of the URL, so it is located by URL parsing
    /// rather than by position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pagination`] if `next_url` is present but carries no
    /// parseable `page_after_id` parameter.
    pub fn next_page_cursor(&self) -> Result<Option<Id>> {
        let Some(next_url) = &self.next_url else {
            return Ok(None);
        };

        let parsed = url::Url::parse(next_url).map_err(|_| Error::Pagination {
            next_url: next_url.clone(),
        })?;
        let cursor = parsed
            .query_pairs()
            .find(|(key, _)| key == "page_after_id")
            .and_then(|(_, value)| value.parse::<u64>().ok());

        match cursor {
            Some(id) => Ok(Some(Id(id))),
            None => Err(Error::Pagination {
                next_url: next_url.clone(),
            }),
        }
    }
}

/// A page of resources as returned by a list endpoint.
///
/// The items of the page live in `data`; `pages` carries the cursors used by
/// [`Client::page_fully`](crate::Client::page_fully) to walk the whole
/// collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collection<T: Default> {
    /// Identity fields of the collection envelope itself.
    #[serde(flatten)]
    pub object: Object,

    /// Total number of items across all pages.
    pub total_count: i64,

    /// Pagination cursors.
    pub pages: PageObject,

    /// The items of this page.
    pub data: Vec<T>,
}

/// Options shared by every API call.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Upper bound on how long the whole call may take, covering every
    /// attempt and the backoff sleeps between retries. When it expires the
    /// call fails with [`Error::Cancelled`](crate::Error::Cancelled) and is
    /// not retried.
    pub timeout: Option<std::time::Duration>,

    /// Ask the server to return data only if it changed since this time.
    /// Sent as an `If-Modified-Since` header in HTTP-date format; a 304
    /// answer sets `not_modified` on the response.
    pub if_modified_since: Option<Timestamp>,

    /// Ask the server to return data only if its ETag differs from this one.
    /// Sent as an `If-None-Match` header.
    pub if_none_match: Option<String>,
}

/// Cursor options shared by every list endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams {
    /// Return items after the one with this ID.
    pub page_after_id: Option<Id>,

    /// Return items before the one with this ID.
    pub page_before_id: Option<Id>,
}

impl ListParams {
    pub(crate) fn apply(&self, query: &mut Query) {
        query.push_opt("page_after_id", self.page_after_id);
        query.push_opt("page_before_id", self.page_before_id);
    }
}
