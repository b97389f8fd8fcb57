//! `/api/files` — zip-code flat file aggregation endpoints.

use actix_web::{HttpResponse, web};
use air_map_aggregation::{
    OutputOrdering, StateCodeResolver, classify_readings, dominant_pollutants, parse_flat,
    state_averages,
};
use air_map_pollution_models::{PollutantSet, RawRecord};
use air_map_server_models::{ApiDominantPollutant, ApiEnvelope, ApiError, ApiFailureMessage};

use crate::AppState;
use crate::auth::AuthedUser;

/// `GET /api/files/map-data`
///
/// Aggregates the flat file by state and reports each state's dominant
/// pollutant. States appear in the order their first row was seen.
pub async fn map_data(state: web::Data<AppState>, _user: AuthedUser) -> HttpResponse {
    let records = match read_records(&state).await {
        Ok(records) => records,
        Err(response) => return response,
    };

    let averages = state_averages(
        &records,
        &StateCodeResolver,
        PollutantSet::Standard,
        OutputOrdering::FirstSeen,
    );
    let dominant: Vec<ApiDominantPollutant> =
        dominant_pollutants(&averages, PollutantSet::Standard)
            .into_iter()
            .map(ApiDominantPollutant::from)
            .collect();

    HttpResponse::Ok().json(ApiEnvelope::data(dominant))
}

/// `GET /api/files/zip/{zip}`
///
/// Classifies the rows recorded for one zip code and returns the first
/// match only — duplicate rows for a zip are not aggregated.
pub async fn by_zip(
    state: web::Data<AppState>,
    path: web::Path<String>,
    _user: AuthedUser,
) -> HttpResponse {
    let zip = path.into_inner();

    let records = match read_records(&state).await {
        Ok(records) => records,
        Err(response) => return response,
    };

    let first = records
        .iter()
        .filter(|record| record.zip.as_deref() == Some(zip.as_str()))
        .map(|record| {
            classify_readings(&record.location_key, &record.readings, PollutantSet::Standard)
        })
        .next();

    first.map_or_else(
        || {
            HttpResponse::NotFound().json(ApiFailureMessage::new(format!(
                "No data found for the provided ZIP code.{zip}"
            )))
        },
        |result| HttpResponse::Ok().json(ApiEnvelope::data(ApiDominantPollutant::from(result))),
    )
}

/// Reads and parses the flat CSV source.
async fn read_records(state: &AppState) -> Result<Vec<RawRecord>, HttpResponse> {
    match tokio::fs::read_to_string(&state.zip_csv_path).await {
        Ok(text) => Ok(parse_flat(&text)),
        Err(e) => {
            log::error!(
                "Failed to read {}: {e}",
                state.zip_csv_path.display()
            );
            Err(HttpResponse::InternalServerError().json(ApiError::new(e.to_string())))
        }
    }
}
