//! Voice actors who narrate vocabulary readings.

use http::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::query::Query;
use crate::response::Response;
use crate::types::{Collection, Id, ListParams, Object, Params, Timestamp};

impl Client {
    /// Returns a page of voice actors, filtered by `params`.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn voice_actor_list(
        &self,
        params: &VoiceActorListParams,
    ) -> Result<Response<Collection<VoiceActor>>> {
        let mut query = Query::new();
        query.push_opt_list("ids", params.ids.as_deref());
        query.push_opt("updated_after", params.updated_after);
        params.list.apply(&mut query);

        self.request(
            Method::GET,
            "/v2/voice_actors",
            query,
            &params.params,
            None::<&()>,
        )
        .await
    }

    /// Returns the voice actor with the given ID.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn voice_actor_get(
        &self,
        params: &VoiceActorGetParams,
    ) -> Result<Response<VoiceActor>> {
        self.request(
            Method::GET,
            &format!("/v2/voice_actors/{}", params.id),
            Query::new(),
            &params.params,
            None::<&()>,
        )
        .await
    }
}

/// A single voice actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceActor {
    #[serde(flatten)]
    pub object: Object,
    pub data: Option<VoiceActorData>,
}

/// Payload of a voice actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceActorData {
    pub created_at: Option<Timestamp>,
    pub description: Option<String>,
    pub gender: Option<String>,
    pub name: String,
}

/// Filters for [`Client::voice_actor_list`].
#[derive(Debug, Clone, Default)]
pub struct VoiceActorListParams {
    /// Common per-request options.
    pub params: Params,
    /// Pagination cursors.
    pub list: ListParams,

    /// Only voice actors with these IDs.
    pub ids: Option<Vec<Id>>,
    /// Only voice actors updated after this time.
    pub updated_after: Option<Timestamp>,
}

/// Options for [`Client::voice_actor_get`].
#[derive(Debug, Clone, Default)]
pub struct VoiceActorGetParams {
    /// Common per-request options.
    pub params: Params,
    /// ID of the voice actor to fetch.
    pub id: Id,
}
