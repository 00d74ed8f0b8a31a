use axum::{extract::{rejection::PathRejection, Path, State}, Json};

use service::catalog::ServiceOffering;

use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/api/services", tag = "services", responses((status = 200, description = "All services ordered by name", body = [crate::openapi::ServiceDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ServiceOffering>>, ApiError> {
    Ok(Json(state.catalog.list().await?))
}

#[utoipa::path(
    get, path = "/api/services/{id}", tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service", body = crate::openapi::ServiceDoc),
        (status = 404, description = "No such service", body = crate::openapi::ErrorResponse),
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ServiceOffering>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request("Invalid service id"))?;
    Ok(Json(state.catalog.get(id).await?))
}
