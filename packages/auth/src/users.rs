//! User account and refresh-token persistence.

use chrono::Utc;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::password::{hash_password, verify_password};
use crate::{AuthError, tags};

/// Data required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address (unique).
    pub email: String,
    /// Plaintext password (hashed before storage).
    pub password: String,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Birthdate (ISO 8601 date).
    pub birthdate: String,
    /// Zip code.
    pub zip_code: String,
    /// Preference/risk tag ids to attach.
    pub tag_ids: Vec<i64>,
}

/// A user profile as surfaced by the API.
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// User UUID.
    pub uuid: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Birthdate (ISO 8601 date).
    pub birthdate: String,
    /// Zip code.
    pub zip_code: String,
    /// When the account was created.
    pub created_at: String,
    /// The user's tags.
    pub tags: Vec<tags::TagInfo>,
}

/// A stored refresh token row.
#[derive(Debug, Clone)]
pub struct StoredRefreshToken {
    /// Row UUID.
    pub uuid: String,
    /// Owning user UUID.
    pub user_uuid: String,
    /// Expiry (RFC 3339).
    pub expires_at: String,
    /// Whether the token has been revoked.
    pub is_revoked: bool,
}

/// Registers a new user, attaching any requested tags.
///
/// # Errors
///
/// Returns [`AuthError::UserExists`] if the email is taken, or
/// [`AuthError::Database`] on query failures.
pub async fn register(db: &dyn Database, new_user: &NewUser) -> Result<UserProfile, AuthError> {
    let existing = db
        .query_raw_params(
            "SELECT uuid FROM users WHERE email = $1",
            &[DatabaseValue::String(new_user.email.clone())],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    if !existing.is_empty() {
        return Err(AuthError::UserExists);
    }

    let uuid = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let password_hash = hash_password(&new_user.password);

    db.exec_raw_params(
        "INSERT INTO users (uuid, email, password_hash, name, surname, birthdate, zip_code, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        &[
            DatabaseValue::String(uuid.clone()),
            DatabaseValue::String(new_user.email.clone()),
            DatabaseValue::String(password_hash),
            DatabaseValue::String(new_user.name.clone()),
            DatabaseValue::String(new_user.surname.clone()),
            DatabaseValue::String(new_user.birthdate.clone()),
            DatabaseValue::String(new_user.zip_code.clone()),
            DatabaseValue::String(now.clone()),
        ],
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    for &tag_id in &new_user.tag_ids {
        db.exec_raw_params(
            "INSERT OR IGNORE INTO user_tags (user_uuid, tag_id) VALUES ($1, $2)",
            &[
                DatabaseValue::String(uuid.clone()),
                DatabaseValue::Int64(tag_id),
            ],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;
    }

    log::info!("registered user {uuid}");

    Ok(UserProfile {
        uuid,
        email: new_user.email.clone(),
        name: new_user.name.clone(),
        surname: new_user.surname.clone(),
        birthdate: new_user.birthdate.clone(),
        zip_code: new_user.zip_code.clone(),
        created_at: now,
        tags: Vec::new(),
    })
}

/// Verifies an email/password pair and returns the matching profile.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] when either the email is
/// unknown or the password doesn't match (indistinguishable on purpose).
pub async fn login(
    db: &dyn Database,
    email: &str,
    password: &str,
) -> Result<UserProfile, AuthError> {
    let rows = db
        .query_raw_params(
            "SELECT uuid, password_hash FROM users WHERE email = $1",
            &[DatabaseValue::String(email.to_string())],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    let row = rows.first().ok_or(AuthError::InvalidCredentials)?;
    let uuid: String = row.to_value("uuid").unwrap_or_default();
    let password_hash: String = row.to_value("password_hash").unwrap_or_default();

    if !verify_password(password, &password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    get_profile(db, &uuid).await
}

/// Loads a user profile with tags.
///
/// # Errors
///
/// Returns [`AuthError::UserNotFound`] if the UUID doesn't exist.
pub async fn get_profile(db: &dyn Database, user_uuid: &str) -> Result<UserProfile, AuthError> {
    let rows = db
        .query_raw_params(
            "SELECT uuid, email, name, surname, birthdate, zip_code, created_at
             FROM users WHERE uuid = $1",
            &[DatabaseValue::String(user_uuid.to_string())],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    let row = rows.first().ok_or(AuthError::UserNotFound)?;

    Ok(UserProfile {
        uuid: row.to_value("uuid").unwrap_or_default(),
        email: row.to_value("email").unwrap_or_default(),
        name: row.to_value("name").unwrap_or_default(),
        surname: row.to_value("surname").unwrap_or_default(),
        birthdate: row.to_value("birthdate").unwrap_or_default(),
        zip_code: row.to_value("zip_code").unwrap_or_default(),
        created_at: row.to_value("created_at").unwrap_or_default(),
        tags: tags::user_tags(db, user_uuid).await?,
    })
}

/// Persists a freshly minted refresh token.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn store_refresh_token(
    db: &dyn Database,
    user_uuid: &str,
    token: &str,
    expires_at: &str,
) -> Result<(), AuthError> {
    db.exec_raw_params(
        "INSERT INTO refresh_tokens (uuid, user_uuid, token, expires_at, is_revoked, created_at)
         VALUES ($1, $2, $3, $4, 0, $5)",
        &[
            DatabaseValue::String(uuid::Uuid::new_v4().to_string()),
            DatabaseValue::String(user_uuid.to_string()),
            DatabaseValue::String(token.to_string()),
            DatabaseValue::String(expires_at.to_string()),
            DatabaseValue::String(Utc::now().to_rfc3339()),
        ],
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(())
}

/// Finds a stored refresh token row by its token value.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn find_refresh_token(
    db: &dyn Database,
    token: &str,
) -> Result<Option<StoredRefreshToken>, AuthError> {
    let rows = db
        .query_raw_params(
            "SELECT uuid, user_uuid, expires_at, is_revoked
             FROM refresh_tokens WHERE token = $1",
            &[DatabaseValue::String(token.to_string())],
        )
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(rows.first().map(|row| StoredRefreshToken {
        uuid: row.to_value("uuid").unwrap_or_default(),
        user_uuid: row.to_value("user_uuid").unwrap_or_default(),
        expires_at: row.to_value("expires_at").unwrap_or_default(),
        is_revoked: row.to_value::<i64>("is_revoked").unwrap_or(0) != 0,
    }))
}

/// Revokes a single refresh token by value.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn revoke_refresh_token(db: &dyn Database, token: &str) -> Result<(), AuthError> {
    db.exec_raw_params(
        "UPDATE refresh_tokens SET is_revoked = 1 WHERE token = $1",
        &[DatabaseValue::String(token.to_string())],
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(())
}

/// Revokes every active refresh token belonging to a user.
///
/// # Errors
///
/// Returns [`AuthError::Database`] on query failures.
pub async fn revoke_all_for_user(db: &dyn Database, user_uuid: &str) -> Result<(), AuthError> {
    db.exec_raw_params(
        "UPDATE refresh_tokens SET is_revoked = 1 WHERE user_uuid = $1 AND is_revoked = 0",
        &[DatabaseValue::String(user_uuid.to_string())],
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(())
}
