use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessToken;
use auth::AuthGuard;
use auth::AuthenticatedSubject;
use auth::Authenticator;
use auth::TokenPair;

use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::session::errors::AuthError;
use crate::session::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Session service: looks accounts up and hands credentials to the
/// authentication core.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    guard: AuthGuard,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new session service.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password check and token minting
    /// * `guard` - Bearer-token verification sharing the authenticator's codec
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>, guard: AuthGuard) -> Self {
        Self {
            repository,
            authenticator,
            guard,
        }
    }

    async fn find_account(&self, username: &str) -> Result<Option<User>, AuthError> {
        // A name that could never have been registered has no account.
        let Ok(username) = Username::new(username.to_string()) else {
            return Ok(None);
        };

        Ok(self.repository.find_by_username(&username).await?)
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let account = self.find_account(username).await?;
        let stored_hash = account.as_ref().map(|user| user.password_hash.as_str());

        match self.authenticator.login(password, stored_hash, username) {
            Ok(tokens) => {
                tracing::info!(username = %username, "User logged in");
                Ok(tokens)
            }
            Err(err) => {
                tracing::info!(username = %username, reason = %err, "Login rejected");
                Err(err.into())
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        self.authenticator.refresh(refresh_token).map_err(|err| {
            tracing::debug!(reason = %err, "Token refresh rejected");
            AuthError::from(err)
        })
    }

    fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedSubject, AuthError> {
        self.guard.authenticate(header).map_err(|err| {
            tracing::debug!(reason = %err, "Request authentication rejected");
            AuthError::from(err)
        })
    }
}
