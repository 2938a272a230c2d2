use auth::AuthenticationError;
use auth::GuardError;
use auth::TokenKind;
use thiserror::Error;

use crate::user::errors::UserError;

/// Errors raised while logging in, refreshing or authenticating a request.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Wrong token kind: expected {expected}, got {actual}")]
    WrongTokenKind {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] GuardError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            AuthenticationError::InvalidToken => AuthError::InvalidToken,
            AuthenticationError::WrongTokenKind { expected, actual } => {
                AuthError::WrongTokenKind { expected, actual }
            }
            AuthenticationError::TokenIssuance(err) => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
