use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures are deliberately collapsed into `InvalidToken`:
/// callers cannot tell an expired token from a forged or malformed one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token subject must not be empty")]
    EmptySubject,

    #[error("Invalid token")]
    InvalidToken,
}

impl TokenError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::EncodingFailed(_) | TokenError::EmptySubject => "TOKEN_ISSUANCE_FAILED",
            TokenError::InvalidToken => "INVALID_TOKEN",
        }
    }
}
