//! Password hashing for locally stored accounts.
//!
//! Argon2id with default parameters, stored as a PHC string
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`) so the salt and
//! cost travel with the hash. Salts are 16 random bytes.

use crate::error::{Result, TrackError};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use tracing::warn;

/// Hash a password under a fresh random salt.
///
/// # Errors
///
/// Returns `TrackError::Other` if Argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String> {
    let failed = |e: argon2::password_hash::Error| {
        TrackError::Other(anyhow::anyhow!("password hashing failed: {e}"))
    };
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>()).map_err(failed)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(failed)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash never verifies.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_phc_argon2id() {
        let stored = hash_password("hunter22").unwrap();
        assert!(stored.starts_with("$argon2id$v=19$"), "{stored}");
        assert!(!stored.contains("hunter22"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        assert_ne!(
            hash_password("hunter22").unwrap(),
            hash_password("hunter22").unwrap()
        );
    }

    #[test]
    fn test_verify_password() {
        let stored = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("hunter22", "not-a-phc-string"));
        // A bare hex digest is not accepted either.
        assert!(!verify_password("hunter22", &"ab".repeat(32)));
    }
}
