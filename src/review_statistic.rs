//! Review statistics: aggregate correct/incorrect counts per subject.

use http::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::query::Query;
use crate::response::Response;
use crate::types::{Collection, Id, ListParams, Object, ObjectType, Params, Timestamp};

impl Client {
    /// Returns a page of review statistics, filtered by `params`.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn review_statistic_list(
        &self,
        params: &ReviewStatisticListParams,
    ) -> Result<Response<Collection<ReviewStatistic>>> {
        let mut query = Query::new();
        query.push_opt("hidden", params.hidden);
        query.push_opt_list("ids", params.ids.as_deref());
        query.push_opt("percentages_greater_than", params.percentages_greater_than);
        query.push_opt("percentages_less_than", params.percentages_less_than);
        query.push_opt_list("subject_ids", params.subject_ids.as_deref());
        query.push_opt_list("subject_types", params.subject_types.as_deref());
        query.push_opt("updated_after", params.updated_after);
        params.list.apply(&mut query);

        self.request(
            Method::GET,
            "/v2/review_statistics",
            query,
            &params.params,
            None::<&()>,
        )
        .await
    }

    /// Returns the review statistic with the given ID.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn review_statistic_get(
        &self,
        params: &ReviewStatisticGetParams,
    ) -> Result<Response<ReviewStatistic>> {
        self.request(
            Method::GET,
            &format!("/v2/review_statistics/{}", params.id),
            Query::new(),
            &params.params,
            None::<&()>,
        )
        .await
    }
}

/// A single review statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewStatistic {
    #[serde(flatten)]
    pub object: Object,
    pub data: Option<ReviewStatisticData>,
}

/// Payload of a review statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewStatisticData {
    pub created_at: Option<Timestamp>,
    pub hidden: bool,
    pub meaning_correct: i64,
    pub meaning_current_streak: i64,
    pub meaning_incorrect: i64,
    pub meaning_max_streak: i64,
    pub percentage_correct: i64,
    pub reading_correct: i64,
    pub reading_current_streak: i64,
    pub reading_incorrect: i64,
    pub reading_max_streak: i64,
    pub subject_id: Id,
    pub subject_type: ObjectType,
}

/// Filters for [`Client::review_statistic_list`].
#[derive(Debug, Clone, Default)]
pub struct ReviewStatisticListParams {
    /// Common per-request options.
    pub params: Params,
    /// Pagination cursors.
    pub list: ListParams,

    /// Only statistics with these IDs.
    pub ids: Option<Vec<Id>>,
    /// Include or exclude hidden statistics.
    pub hidden: Option<bool>,
    /// Only statistics with a percentage correct above this value.
    pub percentages_greater_than: Option<i64>,
    /// Only statistics with a percentage correct below this value.
    pub percentages_less_than: Option<i64>,
    /// Only statistics for these subjects.
    pub subject_ids: Option<Vec<Id>>,
    /// Only statistics for subjects of these types.
    pub subject_types: Option<Vec<ObjectType>>,
    /// Only statistics updated after this time.
    pub updated_after: Option<Timestamp>,
}

/// Options for [`Client::review_statistic_get`].
#[derive(Debug, Clone, Default)]
pub struct ReviewStatisticGetParams {
    /// Common per-request options.
    pub params: Params,
    /// ID of the review statistic to fetch.
    pub id: Id,
}
