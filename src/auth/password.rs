// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification.
//!
//! Passwords are NFKC-normalized, then hashed with Argon2id using a random
//! 128-bit salt. Hashes are stored as PHC strings, so the algorithm
//! parameters and salt travel with the hash. Verification goes through
//! `argon2`, which compares in constant time.

use std::sync::OnceLock;

use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::rngs::OsRng;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),
}

fn normalize(password: &str) -> String {
    password.nfkc().collect()
}

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(normalize(password).as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// An unparsable stored hash never verifies.
pub fn verify_password(password: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(normalize(password).as_bytes(), &parsed)
        .is_ok()
}

/// Spend the same work as a real verification when no user matched.
///
/// Keeps the unknown-email path of a login as slow as the wrong-password
/// path. Always returns `false`.
pub fn verify_dummy_password(password: &str) -> bool {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("dummy password for timing").ok());
    if let Some(phc) = dummy {
        let _ = verify_password(password, phc);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("TestPassword123!").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("TestPassword123!", &hash));
        assert!(!verify_password("WrongPassword123!", &hash));
    }

    #[test]
    fn hash_never_contains_the_password() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same-password", &first));
        assert!(verify_password("same-password", &second));
    }

    #[test]
    fn unicode_forms_are_equivalent() {
        // "é" precomposed vs "e" + combining acute accent
        let hash = hash_password("caf\u{00e9}").unwrap();
        assert!(verify_password("cafe\u{0301}", &hash));
    }

    #[test]
    fn invalid_phc_string_never_verifies() {
        assert!(!verify_password("anything", "not_a_valid_hash"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn dummy_verification_always_fails() {
        assert!(!verify_dummy_password("dummy password for timing"));
        assert!(!verify_dummy_password("anything"));
    }
}
