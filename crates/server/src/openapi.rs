use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String }

#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(ToSchema)]
pub struct CredentialsRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct UserDoc { pub id: i32, pub username: String }

#[derive(ToSchema)]
pub struct SessionResponse { pub token: String, pub user: UserDoc }

#[derive(ToSchema)]
pub struct ServiceDoc {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// `service_id` may also be sent as a numeric string.
#[derive(ToSchema)]
pub struct BookingRequest {
    pub customer_name: String,
    pub address: String,
    /// e.g. `2024-06-01T09:30`
    pub date_time: String,
    pub service_id: i32,
    /// `pending`, `confirmed` or `cancelled`; honoured on update only
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct BookingDoc {
    pub id: i32,
    pub customer_name: String,
    pub address: String,
    pub date_time: String,
    pub service_id: i32,
    pub user_id: i32,
    pub status: String,
    pub created_at: String,
    pub service_name: String,
    pub service_price: f64,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::bookings::list,
        crate::routes::bookings::create,
        crate::routes::bookings::get,
        crate::routes::bookings::update,
        crate::routes::bookings::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            MessageResponse,
            CredentialsRequest,
            UserDoc,
            SessionResponse,
            ServiceDoc,
            BookingRequest,
            BookingDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "bookings")
    )
)]
pub struct ApiDoc;
