//! `/api/s3` — county feed endpoints backed by object storage.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use air_map_aggregation::{
    CountyResolver, OutputOrdering, chunk_rows, csv_rows, parse_chunked, state_averages,
};
use air_map_pollution_models::PollutantSet;
use air_map_s3::{PollutantBucket, latest_csv_key};
use air_map_server_models::{ApiEnvelope, ApiError, ApiObjectInfo, ApiStateAverage};

use crate::AppState;
use crate::auth::AuthedUser;

/// Error reported when the bucket isn't configured.
const NOT_CONFIGURED: &str =
    "AWS credentials or S3 bucket name are not configured in environment variables.";

/// `GET /api/s3/files`
///
/// Lists every object in the pollutant bucket.
pub async fn list_files(state: web::Data<AppState>, _user: AuthedUser) -> HttpResponse {
    let Some(bucket) = bucket(&state) else {
        return HttpResponse::InternalServerError().json(ApiError::new(NOT_CONFIGURED));
    };

    match bucket.list_files().await {
        Ok(objects) => {
            let listed: Vec<ApiObjectInfo> =
                objects.into_iter().map(ApiObjectInfo::from).collect();
            HttpResponse::Ok().json(ApiEnvelope::data(listed))
        }
        Err(e) => {
            log::error!("Failed to list files from S3: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e.to_string()))
        }
    }
}

/// `GET /api/s3/files/latest`
///
/// Reads the latest CSV (greatest key-embedded timestamp) and returns its
/// raw 5-line groups, trailing partial group included.
pub async fn latest_file(state: web::Data<AppState>, _user: AuthedUser) -> HttpResponse {
    let Some(bucket) = bucket(&state) else {
        return HttpResponse::InternalServerError().json(ApiError::new(NOT_CONFIGURED));
    };

    let text = match read_latest(&bucket).await {
        Ok(text) => text,
        Err(response) => return response,
    };

    let chunks = chunk_rows(csv_rows(&text));
    HttpResponse::Ok().json(ApiEnvelope::data(chunks))
}

/// `GET /api/s3/files/latest-by-state`
///
/// Parses the latest CSV's 5-line location chunks, resolves counties to
/// states, and returns per-state averages sorted by state code.
pub async fn latest_by_state(state: web::Data<AppState>, _user: AuthedUser) -> HttpResponse {
    let Some(bucket) = bucket(&state) else {
        return HttpResponse::InternalServerError().json(ApiError::new(NOT_CONFIGURED));
    };

    let text = match read_latest(&bucket).await {
        Ok(text) => text,
        Err(response) => return response,
    };

    let records = parse_chunked(&text);
    let averages: Vec<ApiStateAverage> = state_averages(
        &records,
        &CountyResolver,
        PollutantSet::Extended,
        OutputOrdering::StateSorted,
    )
    .into_iter()
    .map(ApiStateAverage::from)
    .collect();

    HttpResponse::Ok().json(ApiEnvelope::data(averages))
}

fn bucket(state: &AppState) -> Option<Arc<PollutantBucket>> {
    state.bucket.clone()
}

/// Picks and reads the latest CSV object, mapping the empty-bucket and
/// no-CSV cases to their 404 envelopes.
async fn read_latest(bucket: &PollutantBucket) -> Result<String, HttpResponse> {
    let objects = match bucket.list_files().await {
        Ok(objects) => objects,
        Err(e) => {
            log::error!("Failed to list files from S3: {e}");
            return Err(HttpResponse::InternalServerError().json(ApiError::new(e.to_string())));
        }
    };

    if objects.is_empty() {
        return Err(
            HttpResponse::NotFound().json(ApiError::new("No files found in S3 bucket."))
        );
    }

    let Some(key) = latest_csv_key(objects.iter().map(|object| object.key.as_str())) else {
        return Err(HttpResponse::NotFound().json(ApiError::new("No CSV files found.")));
    };
    let key = key.to_string();

    match bucket.read_file(&key).await {
        Ok(text) => Ok(text),
        Err(e) => {
            log::error!("Failed to read {key} from S3: {e}");
            Err(HttpResponse::InternalServerError().json(ApiError::new(e.to_string())))
        }
    }
}
