use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::login::TOKEN_TYPE;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::session::ports::AuthServicePort;

/// Exchange a refresh token for a new access token.
///
/// Public route: the refresh token in the body is the credential.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequestBody>,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    let token = state.auth_service.refresh(&body.refresh_token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshTokenResponseData {
            access_token: token.access_token,
            token_type: TOKEN_TYPE.to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub access_token: String,
    pub token_type: String,
}
