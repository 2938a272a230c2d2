use std::sync::Arc;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::TokenError;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::AuthConfig;

/// Session token codec for minting and verifying tokens.
///
/// Tokens are compact JWS strings (`header.claims.signature`, base64url)
/// signed with the single shared secret from [`AuthConfig`]. Expiry is
/// checked against the injected [`Clock`] at verification time.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec reading time from the system UTC clock.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a codec with an explicit time source.
    ///
    /// # Arguments
    /// * `config` - Signing secret, algorithm and token lifetimes
    /// * `clock` - Time source used for `iat`/`exp` and expiry checks
    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(config.algorithm());
        // Expiry is enforced against the injected clock in `decode_and_verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            header: Header::new(config.algorithm()),
            validation,
            config: config.clone(),
            clock,
        }
    }

    /// Mint an access token for `subject`.
    ///
    /// # Errors
    /// * `EmptySubject` - Subject is empty
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenKind::Access)
    }

    /// Mint a refresh token for `subject`.
    ///
    /// # Errors
    /// * `EmptySubject` - Subject is empty
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenKind::Refresh)
    }

    /// Mint a token of the given kind, valid for the configured lifetime of
    /// that kind.
    pub fn issue(&self, subject: &str, kind: TokenKind) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let lifetime = match kind {
            TokenKind::Access => self.config.access_token_lifetime(),
            TokenKind::Refresh => self.config.refresh_token_lifetime(),
        };
        let claims = Claims::new(subject, kind, self.clock.now(), lifetime);

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// The signature is checked over the full token before the claims are
    /// deserialized. Malformed structure, bad signature, wrong algorithm and
    /// expiry all fail the same way.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is forged, malformed or expired
    pub fn decode_and_verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::InvalidToken
            })?;

        let claims = token_data.claims;
        let now = self.clock.now().timestamp();
        if claims.is_expired(now) {
            tracing::debug!(exp = claims.exp, now, "Token rejected: expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }

    /// Settings this codec was built from.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
