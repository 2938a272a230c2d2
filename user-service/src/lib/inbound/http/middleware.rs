use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::session::ports::AuthServicePort;

/// Extension type to store the authenticated subject in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Middleware that validates bearer tokens and adds the subject to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // A header that is not valid visible ASCII is treated as malformed.
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let subject = state.auth_service.authenticate(header).map_err(|e| {
        tracing::warn!(error = %e, uri = %req.uri(), "Request authentication failed");
        ApiError::from(e).into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        username: subject.subject,
    });

    Ok(next.run(req).await)
}
