use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Purpose of a session token.
///
/// Serialized as `"access"` / `"refresh"` in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token authorizing requests.
    Access,
    /// Longer-lived token only accepted when minting new access tokens.
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session token claims.
///
/// Only trusted once returned by `TokenCodec::decode_and_verify`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Token kind
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl Claims {
    /// Create claims issued at `issued_at` and valid for `lifetime`.
    ///
    /// # Arguments
    /// * `subject` - Username the token is bound to
    /// * `kind` - Access or refresh
    /// * `issued_at` - Mint instant
    /// * `lifetime` - Time until expiry
    pub fn new(
        subject: impl ToString,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let expiration = issued_at + lifetime;

        Self {
            sub: subject.to_string(),
            exp: expiration.timestamp(),
            iat: Some(issued_at.timestamp()),
            kind,
        }
    }

    /// Expiry as a UTC instant, `None` if `exp` is out of range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at the exact second of its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
