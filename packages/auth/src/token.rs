//! HMAC-SHA256 signed tokens with embedded expiry.
//!
//! A token is `base64url(claims JSON) . base64url(hmac(secret, encoded
//! claims))`. Verification checks the signature before decoding the
//! claims, then rejects anything past its expiry. Access and refresh
//! tokens share this shape and differ only in secret and TTL.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Default access token lifetime: 1 hour.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Default refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// The signed token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// UUID of the authenticated user.
    pub user_uuid: String,
    /// The user's email.
    pub email: String,
    /// Expiry as a Unix timestamp (seconds).
    pub exp: i64,
}

/// Mints a signed token for `user_uuid` that expires `ttl_secs` from now.
///
/// # Errors
///
/// Returns [`AuthError::Json`] if the claims fail to serialize.
pub fn mint_token(
    secret: &str,
    user_uuid: &str,
    email: &str,
    ttl_secs: i64,
) -> Result<String, AuthError> {
    let claims = TokenClaims {
        user_uuid: user_uuid.to_string(),
        email: email.to_string(),
        exp: chrono::Utc::now().timestamp() + ttl_secs,
    };

    let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    let signature = URL_SAFE_NO_PAD.encode(sign(secret, &encoded));

    Ok(format!("{encoded}.{signature}"))
}

/// Verifies a token's signature and expiry, returning its claims.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] on a malformed token or bad
/// signature, [`AuthError::ExpiredToken`] when the expiry has passed.
pub fn verify_token(secret: &str, token: &str) -> Result<TokenClaims, AuthError> {
    let (encoded, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;

    let presented = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidToken)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidToken)?;
    mac.update(encoded.as_bytes());
    mac.verify_slice(&presented)
        .map_err(|_| AuthError::InvalidToken)?;

    let claims: TokenClaims = serde_json::from_slice(
        &URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AuthError::InvalidToken)?,
    )
    .map_err(|_| AuthError::InvalidToken)?;

    if claims.exp < chrono::Utc::now().timestamp() {
        return Err(AuthError::ExpiredToken);
    }

    Ok(claims)
}

fn sign(secret: &str, message: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn mint_and_verify_roundtrip() {
        let token = mint_token(SECRET, "abc-123", "a@example.com", 60).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.user_uuid, "abc-123");
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = mint_token(SECRET, "abc-123", "a@example.com", 60).unwrap();
        assert!(matches!(
            verify_token("other-secret", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = mint_token(SECRET, "abc-123", "a@example.com", -1).unwrap();
        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let token = mint_token(SECRET, "abc-123", "a@example.com", 60).unwrap();
        let (encoded, signature) = token.split_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(encoded).unwrap();
        // Flip a byte inside the JSON payload.
        bytes[10] ^= 0x01;
        let forged = format!("{}.{signature}", URL_SAFE_NO_PAD.encode(bytes));
        assert!(matches!(
            verify_token(SECRET, &forged),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            verify_token(SECRET, "not-a-token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            verify_token(SECRET, "a.b.c"),
            Err(AuthError::InvalidToken)
        ));
    }
}
