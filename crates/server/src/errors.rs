use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// HTTP error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    /// 500 with a generic message; `detail` only goes to the log.
    fn internal(public: &str, detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, public)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(_) | AuthError::Conflict => Self::bad_request(e.to_string()),
            AuthError::InvalidCredentials | AuthError::MissingToken => Self::new(StatusCode::UNAUTHORIZED, e.to_string()),
            AuthError::InvalidToken => Self::new(StatusCode::FORBIDDEN, e.to_string()),
            AuthError::Repository(_) => Self::internal("Database error", format_args!("code={} {e}", e.code())),
            AuthError::HashError(_) | AuthError::TokenError(_) => {
                Self::internal("Internal server error", format_args!("code={} {e}", e.code()))
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Db(detail) => Self::internal("Database error", detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected path parameter");
        Self::bad_request("Invalid booking id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        let cases = [
            (AuthError::Conflict, StatusCode::BAD_REQUEST),
            (AuthError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::FORBIDDEN),
            (AuthError::HashError("salt".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn db_details_are_not_exposed() {
        let e = ApiError::from(ServiceError::Db("relation \"booking\" does not exist".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "Database error");

        let e = ApiError::from(ServiceError::NotFound("Booking not found or not authorized".into()));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
    }
}
