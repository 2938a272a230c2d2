use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::ReplaceUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for a full replace; an omitted email clears it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplaceUserRequest {
    username: String,
    #[serde(default)]
    email: Option<String>,
    password: String,
}

impl ReplaceUserRequest {
    fn try_into_command(self) -> Result<ReplaceUserCommand, UserError> {
        Ok(ReplaceUserCommand {
            username: Username::new(self.username)?,
            email: self.email.map(EmailAddress::new).transpose()?,
            password: Password::new(self.password)?,
        })
    }
}

pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReplaceUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;

    state
        .user_service
        .replace_user(&user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
