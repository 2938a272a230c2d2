use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error: a corrupt stored hash is reported
/// as a mismatch instead.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
