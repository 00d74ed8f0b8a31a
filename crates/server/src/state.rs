use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::{AuthConfig, AuthService};
use service::booking::repository::SeaOrmBookingRepository;
use service::booking::BookingService;
use service::catalog::{CatalogService, SeaOrmCatalogRepository};

/// Shared handler state; cloning only bumps reference counts.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub catalog: Arc<CatalogService<SeaOrmCatalogRepository>>,
    pub bookings: Arc<BookingService<SeaOrmBookingRepository, SeaOrmCatalogRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let catalog_repo = Arc::new(SeaOrmCatalogRepository::new(db.clone()));
        Self {
            auth: Arc::new(AuthService::new(Arc::new(SeaOrmAuthRepository::new(db.clone())), auth)),
            catalog: Arc::new(CatalogService::new(catalog_repo.clone())),
            bookings: Arc::new(BookingService::new(Arc::new(SeaOrmBookingRepository::new(db)), catalog_repo)),
        }
    }
}
