//! `/api/auth` — accounts, tags, and AI recommendations.

use std::collections::BTreeMap;

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpRequest, HttpResponse, web};
use air_map_ai::recommend::{PollutantFigures, RecommendationInput, recommend};
use air_map_auth::token::{
    ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS, mint_token, verify_token,
};
use air_map_auth::users::NewUser;
use air_map_auth::{AuthError, requests, tags, users};
use air_map_server_models::{
    ApiEnvelope, ApiError, ApiTag, ApiTagSummary, ApiUser, CreateRequestBody, LoginRequest,
    RefreshRequest, RegisterRequest, TagListRequest,
};

use crate::AppState;
use crate::auth::AuthedUser;
use crate::validate::{validate_login, validate_register};

/// Cookie carrying the refresh token.
const REFRESH_COOKIE: &str = "refreshToken";

/// Builds the HttpOnly refresh token cookie.
fn refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(CookieDuration::seconds(REFRESH_TOKEN_TTL_SECS))
        .finish()
}

/// `POST /api/auth/register`
pub async fn register(state: web::Data<AppState>, body: web::Json<RegisterRequest>) -> HttpResponse {
    if let Err(message) = validate_register(&body) {
        return HttpResponse::BadRequest().json(ApiError::new(message));
    }

    let new_user = NewUser {
        email: body.email.clone(),
        password: body.user_pss.clone(),
        name: body.name.clone(),
        surname: body.surname.clone(),
        birthdate: body.birthdate.clone(),
        zip_code: body.zip_code.clone(),
        tag_ids: body.tag_ids.clone(),
    };

    match users::register(state.db.as_ref(), &new_user).await {
        Ok(profile) => HttpResponse::Created().json(ApiEnvelope::with_message(
            "User registered successfully",
            serde_json::json!({ "user": ApiUser::from(profile) }),
        )),
        Err(e) => HttpResponse::BadRequest().json(ApiError::new(e.to_string())),
    }
}

/// `POST /api/auth/login`
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    if let Err(message) = validate_login(&body) {
        return HttpResponse::BadRequest().json(ApiError::new(message));
    }

    let profile = match users::login(state.db.as_ref(), &body.email, &body.user_pss).await {
        Ok(profile) => profile,
        Err(e) => return HttpResponse::Unauthorized().json(ApiError::new(e.to_string())),
    };

    match issue_tokens(&state, &profile.uuid, &profile.email).await {
        Ok((access_token, refresh_token)) => HttpResponse::Ok()
            .cookie(refresh_cookie(refresh_token))
            .json(ApiEnvelope::with_message(
                "Login successful",
                serde_json::json!({
                    "user": ApiUser::from(profile),
                    "accessToken": access_token,
                }),
            )),
        Err(e) => {
            log::error!("Failed to issue tokens: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Login failed"))
        }
    }
}

/// `POST /api/auth/refresh`
pub async fn refresh(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
) -> HttpResponse {
    let from_body = body.and_then(|b| b.into_inner().refresh_token);
    let from_cookie = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());

    let Some(presented) = from_body.or(from_cookie) else {
        return HttpResponse::Unauthorized().json(ApiError::new("Refresh token required"));
    };

    let Ok(claims) = verify_token(&state.refresh_secret, &presented) else {
        return HttpResponse::Unauthorized().json(ApiError::new("Invalid refresh token"));
    };

    let stored = match users::find_refresh_token(state.db.as_ref(), &presented).await {
        Ok(stored) => stored,
        Err(e) => {
            log::error!("Failed to look up refresh token: {e}");
            return HttpResponse::InternalServerError()
                .json(ApiError::new("Token refresh failed"));
        }
    };

    let valid = stored.as_ref().is_some_and(|row| {
        !row.is_revoked
            && chrono::DateTime::parse_from_rfc3339(&row.expires_at)
                .map(|expires| expires > chrono::Utc::now())
                .unwrap_or(false)
    });
    if !valid {
        return HttpResponse::Unauthorized()
            .json(ApiError::new("Invalid or expired refresh token"));
    }

    if let Err(e) = users::revoke_refresh_token(state.db.as_ref(), &presented).await {
        log::error!("Failed to revoke refresh token: {e}");
        return HttpResponse::InternalServerError().json(ApiError::new("Token refresh failed"));
    }

    match issue_tokens(&state, &claims.user_uuid, &claims.email).await {
        Ok((access_token, refresh_token)) => HttpResponse::Ok()
            .cookie(refresh_cookie(refresh_token))
            .json(ApiEnvelope::with_message(
                "Token refreshed successfully",
                serde_json::json!({ "accessToken": access_token }),
            )),
        Err(e) => {
            log::error!("Failed to issue tokens: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Token refresh failed"))
        }
    }
}

/// `POST /api/auth/logout`
pub async fn logout(state: web::Data<AppState>, req: HttpRequest, user: AuthedUser) -> HttpResponse {
    let result = match req.cookie(REFRESH_COOKIE) {
        Some(cookie) => users::revoke_refresh_token(state.db.as_ref(), cookie.value()).await,
        None => users::revoke_all_for_user(state.db.as_ref(), &user.user_uuid).await,
    };

    if let Err(e) = result {
        log::error!("Logout failed: {e}");
        return HttpResponse::InternalServerError().json(ApiError::new("Logout failed"));
    }

    let mut removal = Cookie::build(REFRESH_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::Ok()
        .cookie(removal)
        .json(ApiEnvelope::<serde_json::Value>::message("Logout successful"))
}

/// `GET /api/auth/profile`
pub async fn profile(state: web::Data<AppState>, user: AuthedUser) -> HttpResponse {
    match users::get_profile(state.db.as_ref(), &user.user_uuid).await {
        Ok(profile) => HttpResponse::Ok().json(ApiEnvelope::data(
            serde_json::json!({ "user": ApiUser::from(profile) }),
        )),
        Err(AuthError::UserNotFound) => {
            HttpResponse::NotFound().json(ApiError::new("User not found"))
        }
        Err(e) => {
            log::error!("Failed to load profile: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to load profile"))
        }
    }
}

/// `GET /api/auth/tags`
pub async fn all_tags(state: web::Data<AppState>) -> HttpResponse {
    match tags::all_tags(state.db.as_ref()).await {
        Ok(all) => {
            let listed: Vec<ApiTag> = all.into_iter().map(ApiTag::from).collect();
            HttpResponse::Ok().json(ApiEnvelope::data(serde_json::json!({ "tags": listed })))
        }
        Err(e) => {
            log::error!("Failed to fetch tags: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to fetch tags"))
        }
    }
}

/// `GET /api/auth/tags/by-type`
pub async fn tags_by_type(state: web::Data<AppState>) -> HttpResponse {
    match tags::tags_by_type(state.db.as_ref()).await {
        Ok(grouped) => {
            let grouped: BTreeMap<String, Vec<ApiTagSummary>> = grouped
                .into_iter()
                .map(|(tag_type, members)| {
                    (
                        tag_type,
                        members.into_iter().map(ApiTagSummary::from).collect(),
                    )
                })
                .collect();
            HttpResponse::Ok()
                .json(ApiEnvelope::data(serde_json::json!({ "tagsByType": grouped })))
        }
        Err(e) => {
            log::error!("Failed to fetch tags by type: {e}");
            HttpResponse::InternalServerError()
                .json(ApiError::new("Failed to fetch tags by type"))
        }
    }
}

/// `GET /api/auth/tags/{id}`
pub async fn tag_by_id(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let Ok(tag_id) = path.into_inner().parse::<i64>() else {
        return HttpResponse::BadRequest().json(ApiError::new("Invalid tag ID provided"));
    };

    match tags::tag_by_id(state.db.as_ref(), tag_id).await {
        Ok(Some(tag_data)) => HttpResponse::Ok().json(ApiEnvelope::data(
            serde_json::json!({ "tag": { "tagData": tag_data } }),
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("Tag not found")),
        Err(e) => {
            log::error!("Failed to fetch tag {tag_id}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to fetch tag"))
        }
    }
}

/// `POST /api/auth/tags/by-list`
pub async fn tags_by_list(
    state: web::Data<AppState>,
    body: web::Json<TagListRequest>,
) -> HttpResponse {
    if body.tag_ids.is_empty() {
        return HttpResponse::BadRequest().json(ApiError::new("Invalid tag IDs provided"));
    }

    match tags::tags_by_list(state.db.as_ref(), &body.tag_ids).await {
        Ok(listed) => {
            HttpResponse::Ok().json(ApiEnvelope::data(serde_json::json!({ "tags": listed })))
        }
        Err(e) => {
            log::error!("Failed to fetch tags: {e}");
            HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Failed to fetch tags: {e}")))
        }
    }
}

/// `POST /api/auth/requests`
///
/// Produces an AI recommendation from the current pollutant figures and
/// the user's tags, then persists the request to history.
pub async fn create_request(
    state: web::Data<AppState>,
    user: AuthedUser,
    body: web::Json<CreateRequestBody>,
) -> HttpResponse {
    let figures = PollutantFigures::placeholder();

    let tag_strings = match tags::tags_by_list(state.db.as_ref(), &body.tag_ids).await {
        Ok(strings) => strings,
        Err(e) => {
            log::error!("Failed to resolve tags for recommendation: {e}");
            return HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Failed to create request: {e}")));
        }
    };

    let tag_names: Vec<String> = tag_strings
        .iter()
        .map(|tag| tag.split(',').next().unwrap_or_default().to_string())
        .collect();

    let input = RecommendationInput {
        country_id: body.country_id,
        out_date: body.out_date.clone(),
        tag_names,
        figures,
    };

    let outcome = match recommend(state.ai.as_deref(), &input).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Recommendation failed: {e}");
            return HttpResponse::InternalServerError()
                .json(ApiError::new(format!("Failed to create request: {e}")));
        }
    };

    let record = requests::RequestRecord {
        user_uuid: user.user_uuid,
        input_params: serde_json::json!({
            "countryId": body.country_id,
            "NO2": figures.no2,
            "O3": figures.o3,
            "CH2O": figures.ch2o,
            "PM": figures.pm,
        })
        .to_string(),
        out_params: outcome.response.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        rating: None,
        tag_ids: body.tag_ids.clone(),
    };

    if let Err(e) = requests::insert_request(state.db.as_ref(), &record).await {
        log::error!("Failed to store recommendation request: {e}");
        return HttpResponse::InternalServerError()
            .json(ApiError::new(format!("Failed to create request: {e}")));
    }

    HttpResponse::Created().json(ApiEnvelope::data(serde_json::json!({
        "recommendation": outcome.response,
        "summary": outcome.summary,
    })))
}

/// Mints the access/refresh token pair and persists the refresh token.
async fn issue_tokens(
    state: &AppState,
    user_uuid: &str,
    email: &str,
) -> Result<(String, String), AuthError> {
    let access_token = mint_token(&state.token_secret, user_uuid, email, ACCESS_TOKEN_TTL_SECS)?;
    let refresh_token = mint_token(
        &state.refresh_secret,
        user_uuid,
        email,
        REFRESH_TOKEN_TTL_SECS,
    )?;

    let expires_at = (chrono::Utc::now() + chrono::Duration::seconds(REFRESH_TOKEN_TTL_SECS))
        .to_rfc3339();
    users::store_refresh_token(state.db.as_ref(), user_uuid, &refresh_token, &expires_at).await?;

    Ok((access_token, refresh_token))
}
