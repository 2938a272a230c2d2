use std::fmt;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Error type for invalid authentication settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Token lifetime must be positive: {0}")]
    NonPositiveLifetime(&'static str),
}

/// Process-wide token settings.
///
/// Built once at start-up and shared by reference with the token codec.
/// Holds the symmetric signing secret, the signing algorithm (HS256) and the
/// lifetimes of access and refresh tokens.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    algorithm: Algorithm,
    access_token_lifetime: Duration,
    refresh_token_lifetime: Duration,
}

impl AuthConfig {
    pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 30;
    pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

    /// Create settings with default lifetimes (30 minutes / 7 days).
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret, should be at least 32 bytes
    ///
    /// # Errors
    /// * `EmptySecret` - Secret has no bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, AuthConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }

        Ok(Self {
            secret,
            algorithm: Algorithm::HS256,
            access_token_lifetime: Duration::minutes(Self::DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh_token_lifetime: Duration::days(Self::DEFAULT_REFRESH_TOKEN_DAYS),
        })
    }

    /// Replace both token lifetimes.
    ///
    /// # Errors
    /// * `NonPositiveLifetime` - Either lifetime is zero or negative
    pub fn with_lifetimes(
        mut self,
        access_token_lifetime: Duration,
        refresh_token_lifetime: Duration,
    ) -> Result<Self, AuthConfigError> {
        if access_token_lifetime <= Duration::zero() {
            return Err(AuthConfigError::NonPositiveLifetime("access"));
        }
        if refresh_token_lifetime <= Duration::zero() {
            return Err(AuthConfigError::NonPositiveLifetime("refresh"));
        }

        self.access_token_lifetime = access_token_lifetime;
        self.refresh_token_lifetime = refresh_token_lifetime;
        Ok(self)
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn access_token_lifetime(&self) -> Duration {
        self.access_token_lifetime
    }

    pub fn refresh_token_lifetime(&self) -> Duration {
        self.refresh_token_lifetime
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .finish()
    }
}
