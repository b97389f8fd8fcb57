#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the air map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the persistence and pipeline types to allow independent evolution
//! of the API contract. The aggregation DTOs keep the upstream feed's
//! `PascalCase` field names (`State`, `MaxPollutant`, `NO2`, ...) because
//! existing clients read them.

use air_map_auth::tags::TagInfo;
use air_map_auth::users::UserProfile;
use air_map_pollution_models::{DominantPollutant, StateAverage};
use air_map_s3::ObjectInfo;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Successful response envelope: `{"success": true, "data": ...}` with an
/// optional human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ApiEnvelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Wraps `data` in a success envelope.
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Wraps `data` in a success envelope with a message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// A success envelope with only a message, no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Failure envelope: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Always `false`.
    pub success: bool,
    /// What went wrong.
    pub error: String,
}

impl ApiError {
    /// Builds a failure envelope.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Failure envelope variant carrying `message` instead of `error` (the
/// zip-lookup endpoint's historical not-found shape).
#[derive(Debug, Clone, Serialize)]
pub struct ApiFailureMessage {
    /// Always `false`.
    pub success: bool,
    /// What went wrong.
    pub message: String,
}

impl ApiFailureMessage {
    /// Builds the failure envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiHealth {
    /// Always `true` when the server responds at all.
    pub success: bool,
    /// Status message.
    pub message: String,
    /// Service version.
    pub version: String,
    /// Current server time (RFC 3339).
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Auth requests
// ---------------------------------------------------------------------------

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address.
    pub email: String,
    /// Password (min 8 characters).
    pub user_pss: String,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Birthdate (ISO 8601 date).
    pub birthdate: String,
    /// Zip code.
    pub zip_code: String,
    /// Preference/risk tag ids.
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub user_pss: String,
}

/// Refresh request body. The token may instead arrive as a cookie.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token, when sent in the body.
    pub refresh_token: Option<String>,
}

/// Tag-list lookup request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagListRequest {
    /// Tag ids to resolve.
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

/// AI recommendation request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    /// Tags shaping the prompt.
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    /// User-selected date.
    pub out_date: Option<String>,
    /// Country the recommendation is for.
    pub country_id: i64,
}

// ---------------------------------------------------------------------------
// Auth responses
// ---------------------------------------------------------------------------

/// A tag as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTag {
    /// Tag id.
    pub tag_id: i64,
    /// Tag name.
    pub tag_name: String,
    /// Tag type.
    pub tag_type: String,
}

impl From<TagInfo> for ApiTag {
    fn from(tag: TagInfo) -> Self {
        Self {
            tag_id: tag.tag_id,
            tag_name: tag.tag_name,
            tag_type: tag.tag_type,
        }
    }
}

/// A tag without its type, used inside the type-keyed grouping where the
/// type is already the map key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTagSummary {
    /// Tag id.
    pub tag_id: i64,
    /// Tag name.
    pub tag_name: String,
}

impl From<TagInfo> for ApiTagSummary {
    fn from(tag: TagInfo) -> Self {
        Self {
            tag_id: tag.tag_id,
            tag_name: tag.tag_name,
        }
    }
}

/// A user profile as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    /// User UUID.
    pub uuid: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Birthdate.
    pub birthdate: String,
    /// Zip code.
    pub zip_code: String,
    /// Account creation time.
    pub created_at: String,
    /// The user's tags.
    pub tags: Vec<ApiTag>,
}

impl From<UserProfile> for ApiUser {
    fn from(profile: UserProfile) -> Self {
        Self {
            uuid: profile.uuid,
            email: profile.email,
            name: profile.name,
            surname: profile.surname,
            birthdate: profile.birthdate,
            zip_code: profile.zip_code,
            created_at: profile.created_at,
            tags: profile.tags.into_iter().map(ApiTag::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation responses
// ---------------------------------------------------------------------------

/// Per-state averages as returned by the county endpoint.
///
/// Field names match the upstream feed (`Location`, `NO2`, ...).
#[derive(Debug, Clone, Serialize)]
pub struct ApiStateAverage {
    /// Two-letter state code.
    #[serde(rename = "Location")]
    pub location: String,
    /// Mean NO2.
    #[serde(rename = "NO2")]
    pub no2: f64,
    /// Mean O3.
    #[serde(rename = "O3")]
    pub o3: f64,
    /// Mean CH2O.
    #[serde(rename = "CH2O")]
    pub ch2o: f64,
    /// Mean PM, when the source reports it.
    #[serde(rename = "PM", skip_serializing_if = "Option::is_none")]
    pub pm: Option<f64>,
}

impl From<StateAverage> for ApiStateAverage {
    fn from(average: StateAverage) -> Self {
        Self {
            location: average.state,
            no2: average.no2,
            o3: average.o3,
            ch2o: average.ch2o,
            pm: average.pm,
        }
    }
}

/// A state's dominant pollutant as returned by the map endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDominantPollutant {
    /// Two-letter state code.
    #[serde(rename = "State")]
    pub state: String,
    /// The maximum averaged pollutant value.
    #[serde(rename = "MaxPollutant")]
    pub max_pollutant: f64,
    /// Which pollutant attained the maximum.
    #[serde(rename = "Pollutant")]
    pub pollutant: String,
}

impl From<DominantPollutant> for ApiDominantPollutant {
    fn from(result: DominantPollutant) -> Self {
        Self {
            state: result.state,
            max_pollutant: result.max_pollutant,
            pollutant: result.pollutant.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// S3 responses
// ---------------------------------------------------------------------------

/// One listed bucket object, in the S3 listing's historical field shape.
#[derive(Debug, Clone, Serialize)]
pub struct ApiObjectInfo {
    /// Object key.
    #[serde(rename = "Key")]
    pub key: String,
    /// Object size in bytes.
    #[serde(rename = "Size")]
    pub size: i64,
    /// Last-modified timestamp.
    #[serde(rename = "LastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl From<ObjectInfo> for ApiObjectInfo {
    fn from(object: ObjectInfo) -> Self {
        Self {
            key: object.key,
            size: object.size,
            last_modified: object.last_modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let json = serde_json::to_value(ApiEnvelope::data(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0], 1);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(ApiError::new("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn dominant_pollutant_uses_feed_field_names() {
        let api = ApiDominantPollutant::from(DominantPollutant {
            state: "CA".to_string(),
            max_pollutant: 20.0,
            pollutant: air_map_pollution_models::Pollutant::No2,
        });
        let json = serde_json::to_value(api).unwrap();
        assert_eq!(json["State"], "CA");
        assert_eq!(json["MaxPollutant"], 20.0);
        assert_eq!(json["Pollutant"], "NO2");
    }

    #[test]
    fn nan_max_serializes_as_null() {
        let api = ApiDominantPollutant {
            state: "CA".to_string(),
            max_pollutant: f64::NAN,
            pollutant: "Unknown".to_string(),
        };
        let json = serde_json::to_value(api).unwrap();
        assert!(json["MaxPollutant"].is_null());
        assert_eq!(json["Pollutant"], "Unknown");
    }

    #[test]
    fn state_average_omits_missing_pm() {
        let api = ApiStateAverage::from(StateAverage {
            state: "TX".to_string(),
            no2: 1.0,
            o3: 2.0,
            ch2o: 3.0,
            pm: None,
        });
        let json = serde_json::to_value(api).unwrap();
        assert_eq!(json["Location"], "TX");
        assert!(json.get("PM").is_none());
    }

    #[test]
    fn register_request_accepts_camel_case() {
        let body = r#"{
            "email": "a@example.com",
            "userPss": "longenough",
            "name": "Ada",
            "surname": "Lovelace",
            "birthdate": "1815-12-10",
            "zipCode": "90001",
            "tagIds": [1, 2]
        }"#;
        let parsed: RegisterRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.zip_code, "90001");
        assert_eq!(parsed.tag_ids, vec![1, 2]);
    }
}
