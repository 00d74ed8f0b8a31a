//! Read-only catalog of bookable services.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// A bookable offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl From<models::catalog::Model> for ServiceOffering {
    fn from(m: models::catalog::Model) -> Self {
        Self { id: m.id, name: m.name, description: m.description, price: m.price }
    }
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All offerings ordered by name.
    async fn list(&self) -> Result<Vec<ServiceOffering>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<ServiceOffering>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCatalogRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list(&self) -> Result<Vec<ServiceOffering>, ServiceError> {
        let rows = models::catalog::list(&self.db).await?;
        Ok(rows.into_iter().map(ServiceOffering::from).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<ServiceOffering>, ServiceError> {
        Ok(models::catalog::get(&self.db, id).await?.map(ServiceOffering::from))
    }
}

pub struct CatalogService<R: CatalogRepository> {
    repo: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<ServiceOffering>, ServiceError> { self.repo.list().await }

    pub async fn get(&self, id: i32) -> Result<ServiceOffering, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("service"))
    }
}

/// In-memory catalog holding the default offerings.
pub mod mock {
    use super::*;

    pub struct MockCatalogRepository {
        pub items: Vec<ServiceOffering>,
    }

    impl Default for MockCatalogRepository {
        fn default() -> Self {
            let items = [
                (1, "Deep Cleaning", "Complete deep cleaning service", 150.0),
                (2, "Carpet Cleaning", "Professional carpet cleaning", 80.0),
                (3, "Window Cleaning", "Interior and exterior window cleaning", 60.0),
                (4, "Kitchen Cleaning", "Detailed kitchen cleaning", 100.0),
                (5, "Bathroom Cleaning", "Complete bathroom sanitization", 70.0),
            ]
            .into_iter()
            .map(|(id, name, description, price)| ServiceOffering {
                id,
                name: name.into(),
                description: Some(description.into()),
                price,
            })
            .collect();
            Self { items }
        }
    }

    #[async_trait]
    impl CatalogRepository for MockCatalogRepository {
        async fn list(&self) -> Result<Vec<ServiceOffering>, ServiceError> {
            let mut items = self.items.clone();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(items)
        }

        async fn get(&self, id: i32) -> Result<Option<ServiceOffering>, ServiceError> {
            Ok(self.items.iter().find(|s| s.id == id).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seeded_catalog_matches_mock_defaults() -> Result<(), anyhow::Error> {
        let svc = CatalogService::new(Arc::new(SeaOrmCatalogRepository::new(get_db().await?)));
        let from_db = svc.list().await?;
        let from_mock = mock::MockCatalogRepository::default().list().await?;
        assert_eq!(from_db, from_mock);
        Ok(())
    }

    #[tokio::test]
    async fn missing_service_is_not_found() {
        let svc = CatalogService::new(Arc::new(mock::MockCatalogRepository::default()));
        assert_eq!(svc.get(4).await.unwrap().name, "Kitchen Cleaning");
        assert!(matches!(svc.get(42).await, Err(ServiceError::NotFound(_))));
    }
}
