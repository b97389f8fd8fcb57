//! Salted password digests.
//!
//! Stored form is `salt$hex(sha256(salt || password))` with a random
//! per-user salt. Verification recomputes the digest with the stored salt
//! and compares.

use sha2::{Digest, Sha256};

/// Hashes `password` with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let digest = digest(&salt, password);
    format!("{salt}${digest}")
}

/// Verifies `password` against a stored `salt$digest` value.
///
/// Unparseable stored values never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    digest(salt, password) == expected
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let stored = hash_password("hunter2-but-longer");
        assert!(verify_password("hunter2-but-longer", &stored));
        assert!(!verify_password("hunter2-but-wrong", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("anything", "no-separator-here"));
        assert!(!verify_password("anything", ""));
    }
}
