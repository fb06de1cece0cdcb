//! Random hex identifiers for users, posts, comments and sessions.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Byte length of user, post and comment identifiers (24 hex chars).
pub const RECORD_ID_BYTES: usize = 12;

/// Byte length of session identifiers (16 hex chars).
pub const SESSION_ID_BYTES: usize = 8;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("entropy source failure: {0}")]
    EntropySource(#[from] rand::Error),
}

/// Generate `len` random bytes from the OS and hex-encode them.
///
/// # Errors
///
/// Returns [`IdError::EntropySource`] if the OS random source fails.
pub fn generate_hex_id(len: usize) -> Result<String, IdError> {
    let mut bytes = vec![0u8; len];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// Identifier for a user, post or comment.
///
/// # Errors
///
/// Returns [`IdError::EntropySource`] if the OS random source fails.
pub fn record_id() -> Result<String, IdError> {
    generate_hex_id(RECORD_ID_BYTES)
}

/// Identifier for a session.
///
/// # Errors
///
/// Returns [`IdError::EntropySource`] if the OS random source fails.
pub fn session_id() -> Result<String, IdError> {
    generate_hex_id(SESSION_ID_BYTES)
}
