use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::ErrorCode;
use super::UserData;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Record of the user the bearer token was issued to.
///
/// A token outliving its account is treated as unauthenticated.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let unauthorized = || {
        ApiError::Unauthorized(
            ErrorCode::Unauthorized,
            "Could not validate credentials".to_string(),
        )
    };

    let username = Username::new(current_user.username.clone()).map_err(|_| unauthorized())?;

    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => {
                tracing::debug!(username = %current_user.username, "Token subject has no account");
                unauthorized()
            }
            other => ApiError::from(other),
        })?;

    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}
