//! AI recommendation request history.
//!
//! Every recommendation request is persisted with its input figures, the
//! model's output, and the tags that shaped the prompt, so requests can be
//! rated and audited later.

use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::AuthError;

/// One recommendation request to persist.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    /// Requesting user's UUID.
    pub user_uuid: String,
    /// JSON-encoded input parameters (country, pollutant figures).
    pub input_params: String,
    /// JSON-encoded model output.
    pub out_params: String,
    /// When the request was made (RFC 3339).
    pub created_at: String,
    /// User rating of the recommendation, if given.
    pub rating: Option<i32>,
    /// Tags that shaped the prompt.
    pub tag_ids: Vec<i64>,
}

/// Inserts a request and its tag links, returning the new request id.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn insert_request(db: &dyn Database, record: &RequestRecord) -> Result<i64, AuthError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO req_history (user_uuid, input_params, out_params, created_at, rating)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING req_id",
            &[
                DatabaseValue::String(record.user_uuid.clone()),
                DatabaseValue::String(record.input_params.clone()),
                DatabaseValue::String(record.out_params.clone()),
                DatabaseValue::String(record.created_at.clone()),
                record
                    .rating
                    .map_or(DatabaseValue::Null, |r| DatabaseValue::Int64(i64::from(r))),
            ],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    let req_id: i64 = rows
        .first()
        .and_then(|r| r.to_value("req_id").ok())
        .unwrap_or(0);

    for &tag_id in &record.tag_ids {
        db.exec_raw_params(
            "INSERT OR IGNORE INTO req_tags (req_id, tag_id) VALUES ($1, $2)",
            &[
                DatabaseValue::Int64(req_id),
                DatabaseValue::Int64(tag_id),
            ],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;
    }

    log::info!("stored recommendation request {req_id}");
    Ok(req_id)
}
