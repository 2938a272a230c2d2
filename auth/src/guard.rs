use std::sync::Arc;

use thiserror::Error;

use crate::jwt::TokenCodec;
use crate::jwt::TokenKind;

/// Identity resolved from a verified access token.
///
/// Scoped to a single request, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    pub subject: String,
}

impl AuthenticatedSubject {
    pub fn as_str(&self) -> &str {
        &self.subject
    }
}

/// Reason a request was refused by [`AuthGuard`].
///
/// Every variant surfaces as the same `UNAUTHORIZED` code; the variant only
/// feeds logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token has no subject")]
    EmptySubject,

    #[error("Expected an access token, got a {0} token")]
    WrongTokenKind(TokenKind),
}

impl GuardError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        "UNAUTHORIZED"
    }
}

/// Request guard turning an `Authorization` header value into an
/// [`AuthenticatedSubject`].
///
/// Only access tokens are accepted: a refresh token presented as a bearer
/// credential is refused.
#[derive(Clone)]
pub struct AuthGuard {
    codec: Arc<TokenCodec>,
}

impl AuthGuard {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Authenticate a request from its raw `Authorization` header value.
    ///
    /// # Arguments
    /// * `header` - Header value, `None` when the request carries none
    ///
    /// # Errors
    /// * `MissingHeader` - No header
    /// * `MalformedHeader` - Not of the form `Bearer <token>`
    /// * `InvalidToken` - Signature, structure or expiry check failed
    /// * `EmptySubject` - Token carries an empty `sub`
    /// * `WrongTokenKind` - Token is not an access token
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedSubject, GuardError> {
        let token = extract_bearer(header.ok_or(GuardError::MissingHeader)?)?;

        let claims = self
            .codec
            .decode_and_verify(token)
            .map_err(|_| GuardError::InvalidToken)?;

        if claims.sub.is_empty() {
            return Err(GuardError::EmptySubject);
        }

        if claims.kind != TokenKind::Access {
            return Err(GuardError::WrongTokenKind(claims.kind));
        }

        Ok(AuthenticatedSubject {
            subject: claims.sub,
        })
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively; the token must be a single
/// non-empty word.
pub fn extract_bearer(header: &str) -> Result<&str, GuardError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(GuardError::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(GuardError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(GuardError::MalformedHeader);
    }

    Ok(token)
}
