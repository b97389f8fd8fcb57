//! Bearer-token request authentication.
//!
//! Protected handlers take an [`AuthedUser`] parameter; extraction fails
//! with a 401 envelope when the `Authorization` header is missing or the
//! access token doesn't verify.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use air_map_auth::token::verify_token;
use air_map_server_models::ApiError;

use crate::AppState;

/// The authenticated caller, extracted from the access token.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    /// UUID of the authenticated user.
    pub user_uuid: String,
    /// The user's email.
    pub email: String,
}

/// Rejection carrying the 401 envelope.
#[derive(Debug)]
pub struct AuthRejection {
    message: &'static str,
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthRejection {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(ApiError::new(self.message))
    }
}

impl FromRequest for AuthedUser {
    type Error = AuthRejection;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthedUser, AuthRejection> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return Err(AuthRejection {
            message: "Server state unavailable",
        });
    };

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthRejection {
            message: "Access token required",
        })?;

    let claims = verify_token(&state.token_secret, token).map_err(|_| AuthRejection {
        message: "Invalid or expired access token",
    })?;

    Ok(AuthedUser {
        user_uuid: claims.user_uuid,
        email: claims.email,
    })
}
