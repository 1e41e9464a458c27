//! The user account the API token belongs to.

use http::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::query::Query;
use crate::response::Response;
use crate::types::{Id, Object, Params, Timestamp};

impl Client {
    /// Returns the user owning the API token.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn user_get(&self, params: &UserGetParams) -> Result<Response<User>> {
        self.request(
            Method::GET,
            "/v2/user",
            Query::new(),
            &params.params,
            None::<&()>,
        )
        .await
    }

    /// Updates the user's preferences. Only fields that are set are sent,
    /// so unset fields keep their server-side values.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error; see [`crate::Error`].
    pub async fn user_update(&self, params: &UserUpdateParams) -> Result<Response<User>> {
        let wrapper = UserUpdateParamsWrapper { user: params };
        self.request(
            Method::PUT,
            "/v2/user",
            Query::new(),
            &params.params,
            Some(&wrapper),
        )
        .await
    }
}

/// The user resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(flatten)]
    pub object: Object,
    pub data: Option<UserData>,
}

/// Payload of the user resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub current_vacation_started_at: Option<Timestamp>,
    pub id: String,
    pub level: i64,
    pub preferences: Option<UserPreferences>,
    pub profile_url: String,
    pub started_at: Option<Timestamp>,
    pub subscription: Option<UserSubscription>,
    pub username: String,
}

/// Lesson and review preferences of the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub default_voice_actor_id: Option<Id>,
    pub lessons_autoplay_audio: bool,
    pub lessons_batch_size: i64,
    pub lessons_presentation_order: Option<String>,
    pub reviews_autoplay_audio: bool,
    pub reviews_display_srs_indicator: bool,
}

/// Subscription state of the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSubscription {
    pub active: bool,
    pub max_level_granted: i64,
    pub period_ends_at: Option<Timestamp>,
    #[serde(rename = "type")]
    pub subscription_type: Option<String>,
}

/// Options for [`Client::user_get`].
#[derive(Debug, Clone, Default)]
pub struct UserGetParams {
    /// Common per-request options.
    pub params: Params,
}

/// Options for [`Client::user_update`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdateParams {
    /// Common per-request options.
    #[serde(skip)]
    pub params: Params,

    /// Preference changes to apply. Absent fields are left untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserUpdatePreferencesParams>,
}

/// Preference fields for a partial user update. Every field is optional so
/// only explicitly set values appear in the request body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdatePreferencesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_voice_actor_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons_autoplay_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons_batch_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons_presentation_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews_autoplay_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews_display_srs_indicator: Option<bool>,
}

#[derive(Serialize)]
struct UserUpdateParamsWrapper<'a> {
    user: &'a UserUpdateParams,
}
