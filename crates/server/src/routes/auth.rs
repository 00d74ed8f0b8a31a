use axum::{extract::{rejection::JsonRejection, State}, Json};

use service::auth::domain::{AuthSession, LoginInput, RegisterInput};

use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/api/register", tag = "auth",
    request_body = crate::openapi::CredentialsRequest,
    responses(
        (status = 200, description = "Registered and signed in", body = crate::openapi::SessionResponse),
        (status = 400, description = "Missing fields or username taken", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.auth.register(input).await?))
}

#[utoipa::path(
    post, path = "/api/login", tag = "auth",
    request_body = crate::openapi::CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = crate::openapi::SessionResponse),
        (status = 400, description = "Missing fields", body = crate::openapi::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.auth.login(input).await?))
}
