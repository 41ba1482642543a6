//! Password hashing with bcrypt.
//!
//! bcrypt only reads the first 72 bytes of its input. Both hashing and
//! verification cut the UTF-8 encoding of the password to that limit first, so
//! a long password that registered successfully always verifies the same way.

use crate::error::AppError;
use bcrypt::{hash, verify};

/// Maximum number of password bytes bcrypt takes into account.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

fn truncate_password(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(BCRYPT_MAX_PASSWORD_BYTES)]
}

/// Hashes a password with a fresh salt at the given bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(truncate_password(password), cost)?)
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// A malformed hash is a failed verification, not an error.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(truncate_password(password), hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::debug!("password verification against malformed hash: {}", e);
            false
        }
    }
}
