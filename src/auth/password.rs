//! Credential store: one hashing scheme system-wide.
//!
//! Argon2id with a fresh random salt per credential; the output is a
//! self-describing PHC string, so verification needs nothing but the
//! stored value. Plaintext passwords are never stored or logged.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(plaintext: &str) -> AppResult<String> {
    if plaintext.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a plaintext against a stored credential. Malformed or empty
/// stored values verify to false rather than erroring; the underlying
/// argon2 comparison is constant-time.
pub fn verify_password(plaintext: &str, credential: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(credential) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
