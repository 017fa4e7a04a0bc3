//! Password hashing primitives
//!
//! One-way salted hashing with argon2; hashes are stored as PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{distributions::Alphanumeric, Rng};

use crate::error::{CoreError, CoreResult};

/// Length of generated temporary passwords
const TEMP_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password with a fresh random salt
pub fn hash(plaintext: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| CoreError::Unexpected(format!("Password hashing failed: {}", e)))?;
    Ok(hashed.to_string())
}

/// Check a plaintext password against a stored PHC string. A malformed
/// stored hash verifies as false rather than erroring.
pub fn verify(plaintext: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Random alphanumeric temporary password for restored accounts
pub fn generate_temporary() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}
