use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Extension, Json,
};

use common::types::MessageBody;
use service::auth::domain::Identity;
use service::booking::domain::{BookingInput, BookingView};

use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/api/bookings", tag = "bookings",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's bookings, latest scheduled first", body = [crate::openapi::BookingDoc]),
        (status = 401, description = "Missing token", body = crate::openapi::ErrorResponse),
        (status = 403, description = "Invalid token", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(me): Extension<Identity>,
) -> Result<Json<Vec<BookingView>>, ApiError> {
    Ok(Json(state.bookings.list(me.user_id).await?))
}

#[utoipa::path(
    post, path = "/api/bookings", tag = "bookings",
    security(("bearer" = [])),
    request_body = crate::openapi::BookingRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BookingDoc),
        (status = 400, description = "Missing or invalid fields", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(me): Extension<Identity>,
    payload: Result<Json<BookingInput>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingView>), ApiError> {
    let Json(input) = payload?;
    let created = state.bookings.create(me.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/bookings/{id}", tag = "bookings",
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = crate::openapi::BookingDoc),
        (status = 404, description = "Not found or not owned by caller", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(me): Extension<Identity>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<BookingView>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.bookings.get(me.user_id, id).await?))
}

#[utoipa::path(
    put, path = "/api/bookings/{id}", tag = "bookings",
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Booking id")),
    request_body = crate::openapi::BookingRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BookingDoc),
        (status = 400, description = "Missing or invalid fields", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not found or not owned by caller", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(me): Extension<Identity>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<BookingInput>, JsonRejection>,
) -> Result<Json<BookingView>, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(state.bookings.update(me.user_id, id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/bookings/{id}", tag = "bookings",
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageResponse),
        (status = 404, description = "Not found or not owned by caller", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(me): Extension<Identity>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let Path(id) = id?;
    state.bookings.delete(me.user_id, id).await?;
    Ok(Json(MessageBody { message: "Booking deleted successfully".into() }))
}
