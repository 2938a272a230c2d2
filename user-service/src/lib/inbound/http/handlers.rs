use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::movie::errors::ScraperError;
use crate::session::errors::AuthError;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod get_profile;
pub mod get_top_movies;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod refresh_token;
pub mod replace_user;
pub mod update_user;

pub const ERROR_CODE_HEADER: &str = "x-error-code";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Machine-readable error codes, stable across releases.
///
/// Sent both in the error body and in the `x-error-code` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCredentials,
    InvalidToken,
    WrongTokenKind,
    Unauthorized,
    UserNotFound,
    UsernameTaken,
    EmailTaken,
    InvalidUsername,
    InvalidEmail,
    InvalidPassword,
    InvalidUserId,
    ScrapeFailed,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::WrongTokenKind => "WRONG_TOKEN_KIND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::UsernameTaken => "USERNAME_TAKEN",
            ErrorCode::EmailTaken => "EMAIL_TAKEN",
            ErrorCode::InvalidUsername => "INVALID_USERNAME",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidPassword => "INVALID_PASSWORD",
            ErrorCode::InvalidUserId => "INVALID_USER_ID",
            ErrorCode::ScrapeFailed => "SCRAPE_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(ErrorCode, String),
    BadRequest(ErrorCode, String),
    NotFound(ErrorCode, String),
    Conflict(ErrorCode, String),
    Unauthorized(ErrorCode, String),
    BadGateway(ErrorCode, String),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InternalServerError(_) => ErrorCode::InternalError,
            ApiError::UnprocessableEntity(code, _)
            | ApiError::BadRequest(code, _)
            | ApiError::NotFound(code, _)
            | ApiError::Conflict(code, _)
            | ApiError::Unauthorized(code, _)
            | ApiError::BadGateway(code, _) => *code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::UnprocessableEntity(_, msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(_, msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(_, msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(_, msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(_, msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadGateway(_, msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (
            status,
            [(
                HeaderName::from_static(ERROR_CODE_HEADER),
                HeaderValue::from_static(code.as_str()),
            )],
            Json(ApiResponseBody::new_error(status, code, message)),
        )
            .into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::NotFound(_) | UserError::NotFoundByUsername(_) => {
                ApiError::NotFound(ErrorCode::UserNotFound, message)
            }
            UserError::UsernameAlreadyExists(_) => {
                ApiError::Conflict(ErrorCode::UsernameTaken, message)
            }
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(ErrorCode::EmailTaken, message),
            UserError::InvalidUsername(_) => {
                ApiError::UnprocessableEntity(ErrorCode::InvalidUsername, message)
            }
            UserError::InvalidEmail(_) => {
                ApiError::UnprocessableEntity(ErrorCode::InvalidEmail, message)
            }
            UserError::InvalidPassword(_) => {
                ApiError::UnprocessableEntity(ErrorCode::InvalidPassword, message)
            }
            UserError::InvalidUserId(_) => ApiError::BadRequest(ErrorCode::InvalidUserId, message),
            UserError::Password(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(message)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized(ErrorCode::InvalidCredentials, message)
            }
            AuthError::InvalidToken => ApiError::Unauthorized(ErrorCode::InvalidToken, message),
            AuthError::WrongTokenKind { .. } => {
                ApiError::Unauthorized(ErrorCode::WrongTokenKind, message)
            }
            // The guard's reason stays in the logs.
            AuthError::Unauthorized(_) => ApiError::Unauthorized(
                ErrorCode::Unauthorized,
                "Could not validate credentials".to_string(),
            ),
            AuthError::Internal(_) => ApiError::InternalServerError(message),
        }
    }
}

impl From<ScraperError> for ApiError {
    fn from(err: ScraperError) -> Self {
        match err {
            ScraperError::Setup(_) => ApiError::InternalServerError(err.to_string()),
            _ => ApiError::BadGateway(ErrorCode::ScrapeFailed, err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, code: ErrorCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { code, message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: ErrorCode,
    pub message: String,
}

/// Public representation of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_ref().map(|email| email.as_str().to_string()),
            created_at: user.created_at,
        }
    }
}
