use async_trait::async_trait;
use auth::AccessToken;
use auth::AuthenticatedSubject;
use auth::TokenPair;

use crate::session::errors::AuthError;

/// Port for login, token refresh and request authentication.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Check a username/password pair and mint an access/refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `Internal` - User lookup or token minting failed
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a fresh access token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is forged, malformed or expired
    /// * `WrongTokenKind` - Token is not a refresh token
    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthError>;

    /// Resolve the subject of a raw `Authorization` header value.
    ///
    /// # Errors
    /// * `Unauthorized` - Header missing, malformed, or carrying a rejected token
    fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedSubject, AuthError>;
}
