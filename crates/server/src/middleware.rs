use axum::{extract::{Request, State}, http::header::AUTHORIZATION, middleware::Next, response::Response};
use tracing::warn;

use service::auth::errors::AuthError;

use crate::errors::ApiError;
use crate::state::ServerState;

/// Require `Authorization: Bearer <token>` and attach the caller's
/// `Identity` to the request extensions.
///
/// Missing header yields 401, a malformed, forged or expired token 403.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(AUTHORIZATION) {
        Some(v) => Some(v.to_str().map_err(|_| ApiError::from(AuthError::InvalidToken))?),
        None => None,
    };

    let identity = state.auth.verify_authorization(header).map_err(|e| {
        warn!(path = %req.uri().path(), error = %e, "rejected unauthenticated request");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
