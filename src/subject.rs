//! Subjects: the radicals, kanji, and vocabulary that make up the
//! curriculum.

use http::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::query::Query;
use crate::response::Response;
use crate::types::{Collection, Id, ListParams, Object, ObjectType, Params, Timestamp};

impl Client {
    /// Returns a page of subjects, filtered by `params`.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn subject_list(
        &self,
        params: &SubjectListParams,
    ) -> Result<Response<Collection<Subject>>> {
        let mut query = Query::new();
        query.push_opt("hidden", params.hidden);
        query.push_opt_list("ids", params.ids.as_deref());
        query.push_opt_list("levels", params.levels.as_deref());
        query.push_opt_list("slugs", params.slugs.as_deref());
        query.push_opt_list("types", params.types.as_deref());
        query.push_opt("updated_after", params.updated_after);
        params.list.apply(&mut query);

        self.request(Method::GET, "/v2/subjects", query, &params.params, None::<&()>)
            .await
    }

    /// Returns the subject with the given ID.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn subject_get(&self, params: &SubjectGetParams) -> Result<Response<Subject>> {
        self.request(
            Method::GET,
            &format!("/v2/subjects/{}", params.id),
            Query::new(),
            &params.params,
            None::<&()>,
        )
        .await
    }
}

/// A single subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    #[serde(flatten)]
    pub object: Object,
    pub data: Option<SubjectData>,
}

/// Payload of a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectData {
    pub auxiliary_meanings: Vec<SubjectAuxiliaryMeaning>,
    pub characters: Option<String>,
    pub created_at: Option<Timestamp>,
    pub document_url: Option<String>,
    pub hidden_at: Option<Timestamp>,
    pub lesson_position: i64,
    pub level: i64,
    pub meaning_mnemonic: Option<String>,
    pub meanings: Vec<SubjectMeaning>,
    pub slug: Option<String>,
    pub spaced_repetition_system_id: Option<Id>,
}

/// A meaning of a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectMeaning {
    pub accepted_answer: bool,
    pub meaning: String,
    pub primary: bool,
}

/// An alternative meaning, accepted or explicitly rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectAuxiliaryMeaning {
    pub meaning: String,
    #[serde(rename = "type")]
    pub meaning_type: Option<String>,
}

/// Filters for [`Client::subject_list`].
#[derive(Debug, Clone, Default)]
pub struct SubjectListParams {
    /// Common per-request options.
    pub params: Params,
    /// Pagination cursors.
    pub list: ListParams,

    /// Only subjects with these IDs.
    pub ids: Option<Vec<Id>>,
    /// Include or exclude hidden subjects.
    pub hidden: Option<bool>,
    /// Only subjects at these levels.
    pub levels: Option<Vec<i64>>,
    /// Only subjects with these slugs.
    pub slugs: Option<Vec<String>>,
    /// Only subjects of these types.
    pub types: Option<Vec<ObjectType>>,
    /// Only subjects updated after this time.
    pub updated_after: Option<Timestamp>,
}

/// Options for [`Client::subject_get`].
#[derive(Debug, Clone, Default)]
pub struct SubjectGetParams {
    /// Common per-request options.
    pub params: Params,
    /// ID of the subject to fetch.
    pub id: Id,
}
