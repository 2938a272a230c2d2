use std::sync::Arc;

use crate::config::AuthConfig;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenKind;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token minting.
///
/// Account lookup is left to the caller; this type only sees the stored hash
/// (or its absence) for the account being logged into.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    // Verified against when the account does not exist, so that unknown
    // usernames cost as much as wrong passwords.
    decoy_hash: Option<String>,
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token returned by a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Wrong token kind: expected {expected}, got {actual}")]
    WrongTokenKind {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Token issuance failed: {0}")]
    TokenIssuance(TokenError),
}

impl AuthenticationError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthenticationError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthenticationError::InvalidToken => "INVALID_TOKEN",
            AuthenticationError::WrongTokenKind { .. } => "WRONG_TOKEN_KIND",
            AuthenticationError::TokenIssuance(err) => err.code(),
        }
    }
}

impl From<TokenError> for AuthenticationError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => AuthenticationError::InvalidToken,
            other => AuthenticationError::TokenIssuance(other),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator with the default password hasher and a
    /// system-clock token codec.
    ///
    /// # Arguments
    /// * `config` - Token signing settings
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_components(PasswordHasher::new(), Arc::new(TokenCodec::new(config)))
    }

    /// Create an authenticator from explicit parts.
    ///
    /// The codec is shared so that the request guard verifies with the same
    /// key and clock.
    pub fn with_components(password_hasher: PasswordHasher, codec: Arc<TokenCodec>) -> Self {
        let decoy_hash = password_hasher.hash("decoy-password").ok();

        Self {
            password_hasher,
            codec,
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and mint an access/refresh token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password submitted by the client
    /// * `stored_hash` - Stored hash of the account, `None` if no such account
    /// * `subject` - Username the tokens are bound to
    ///
    /// # Returns
    /// TokenPair with access and refresh tokens
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown account or wrong password, indistinguishably
    /// * `TokenIssuance` - Token generation failed
    pub fn login(
        &self,
        password: &str,
        stored_hash: Option<&str>,
        subject: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        let is_valid = match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => {
                if let Some(decoy) = &self.decoy_hash {
                    let _ = self.password_hasher.verify(password, decoy);
                }
                false
            }
        };

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(TokenPair {
            access_token: self.codec.issue_access_token(subject)?,
            refresh_token: self.codec.issue_refresh_token(subject)?,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The password is not re-checked.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is forged, malformed, expired or has an empty subject
    /// * `WrongTokenKind` - Token is an access token
    /// * `TokenIssuance` - Token generation failed
    pub fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthenticationError> {
        let claims = self.codec.decode_and_verify(refresh_token)?;

        if claims.kind != TokenKind::Refresh {
            return Err(AuthenticationError::WrongTokenKind {
                expected: TokenKind::Refresh,
                actual: claims.kind,
            });
        }

        if claims.sub.is_empty() {
            return Err(AuthenticationError::InvalidToken);
        }

        Ok(AccessToken {
            access_token: self.codec.issue_access_token(&claims.sub)?,
        })
    }

    /// Codec shared with the request guard.
    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }
}
