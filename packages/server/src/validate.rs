//! Request body validation.
//!
//! Deserialization already enforces types and required fields; these
//! checks cover the value-level rules (email shape, password length) and
//! produce the messages surfaced in 400 envelopes.

use air_map_server_models::{LoginRequest, RegisterRequest};

/// Minimum password length for registration.
const MIN_PASSWORD_LEN: usize = 8;

/// Validates a registration body.
///
/// # Errors
///
/// Returns a human-readable description of the first failed rule.
pub fn validate_register(body: &RegisterRequest) -> Result<(), String> {
    if !is_valid_email(&body.email) {
        return Err("\"email\" must be a valid email".to_string());
    }
    if body.user_pss.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "\"userPss\" length must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    for (value, field) in [
        (&body.name, "name"),
        (&body.surname, "surname"),
        (&body.birthdate, "birthdate"),
        (&body.zip_code, "zipCode"),
    ] {
        if value.trim().is_empty() {
            return Err(format!("\"{field}\" is not allowed to be empty"));
        }
    }
    if body.tag_ids.iter().any(|&id| id <= 0) {
        return Err("\"tagIds\" must contain positive numbers".to_string());
    }
    Ok(())
}

/// Validates a login body.
///
/// # Errors
///
/// Returns a human-readable description of the first failed rule.
pub fn validate_login(body: &LoginRequest) -> Result<(), String> {
    if !is_valid_email(&body.email) {
        return Err("\"email\" must be a valid email".to_string());
    }
    if body.user_pss.is_empty() {
        return Err("\"userPss\" is not allowed to be empty".to_string());
    }
    Ok(())
}

/// Minimal email shape check: `local@domain.tld` with a non-empty local
/// part and a dot somewhere after the `@`.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_body() -> RegisterRequest {
        RegisterRequest {
            email: "ada@example.com".to_string(),
            user_pss: "longenough".to_string(),
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            birthdate: "1815-12-10".to_string(),
            zip_code: "90001".to_string(),
            tag_ids: vec![1],
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_register(&register_body()).is_ok());
    }

    #[test]
    fn rejects_bad_email() {
        for email in ["", "no-at-sign", "a@b", "a@.com", "@example.com", "a@b..c"] {
            let mut body = register_body();
            body.email = email.to_string();
            assert!(validate_register(&body).is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn rejects_short_password() {
        let mut body = register_body();
        body.user_pss = "short".to_string();
        let err = validate_register(&body).unwrap_err();
        assert!(err.contains("userPss"));
    }

    #[test]
    fn rejects_empty_fields() {
        let mut body = register_body();
        body.zip_code = "  ".to_string();
        let err = validate_register(&body).unwrap_err();
        assert!(err.contains("zipCode"));
    }

    #[test]
    fn rejects_non_positive_tag_ids() {
        let mut body = register_body();
        body.tag_ids = vec![1, 0];
        assert!(validate_register(&body).is_err());
    }

    #[test]
    fn login_requires_password() {
        let body = LoginRequest {
            email: "ada@example.com".to_string(),
            user_pss: String::new(),
        };
        assert!(validate_login(&body).is_err());
    }
}
