use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::booking::{BookingFields, BookingStatus};

use super::domain::BookingView;
use crate::errors::ServiceError;

/// Booking persistence. Every method is scoped to `owner`.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list_for_owner(&self, owner: i32) -> Result<Vec<BookingView>, ServiceError>;
    async fn find_for_owner(&self, owner: i32, id: i32) -> Result<Option<BookingView>, ServiceError>;
    async fn insert(&self, owner: i32, fields: BookingFields) -> Result<BookingView, ServiceError>;
    /// `None` when no booking `id` belongs to `owner`.
    async fn update_for_owner(&self, owner: i32, id: i32, fields: BookingFields, status: Option<BookingStatus>) -> Result<Option<BookingView>, ServiceError>;
    async fn delete_for_owner(&self, owner: i32, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBookingRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn joined(row: models::booking::WithService) -> Result<BookingView, ServiceError> {
    let (b, s) = row;
    let s = s.ok_or_else(|| ServiceError::Db(format!("booking {} references missing service {}", b.id, b.service_id)))?;
    Ok(BookingView::from_models(b, s))
}

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn list_for_owner(&self, owner: i32) -> Result<Vec<BookingView>, ServiceError> {
        models::booking::list_for_owner(&self.db, owner)
            .await?
            .into_iter()
            .map(joined)
            .collect()
    }

    async fn find_for_owner(&self, owner: i32, id: i32) -> Result<Option<BookingView>, ServiceError> {
        models::booking::find_for_owner(&self.db, owner, id)
            .await?
            .map(joined)
            .transpose()
    }

    async fn insert(&self, owner: i32, fields: BookingFields) -> Result<BookingView, ServiceError> {
        let created = models::booking::create(&self.db, owner, fields).await?;
        self.find_for_owner(owner, created.id)
            .await?
            .ok_or_else(|| ServiceError::Db(format!("booking {} vanished after insert", created.id)))
    }

    async fn update_for_owner(&self, owner: i32, id: i32, fields: BookingFields, status: Option<BookingStatus>) -> Result<Option<BookingView>, ServiceError> {
        if !models::booking::update_for_owner(&self.db, owner, id, fields, status).await? {
            return Ok(None);
        }
        self.find_for_owner(owner, id).await
    }

    async fn delete_for_owner(&self, owner: i32, id: i32) -> Result<bool, ServiceError> {
        Ok(models::booking::delete_for_owner(&self.db, owner, id).await?)
    }
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::catalog::ServiceOffering;

    pub struct MockBookingRepository {
        services: Vec<ServiceOffering>,
        rows: Mutex<Vec<BookingView>>,
        next_id: AtomicI32,
    }

    impl MockBookingRepository {
        pub fn new(services: Vec<ServiceOffering>) -> Self {
            Self { services, rows: Mutex::new(Vec::new()), next_id: AtomicI32::new(1) }
        }

        fn service(&self, id: i32) -> Result<&ServiceOffering, ServiceError> {
            self.services
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| ServiceError::Db(format!("foreign key violation: service {id}")))
        }
    }

    #[async_trait]
    impl BookingRepository for MockBookingRepository {
        async fn list_for_owner(&self, owner: i32) -> Result<Vec<BookingView>, ServiceError> {
            let mut out: Vec<_> = self.rows.lock().unwrap().iter().filter(|b| b.user_id == owner).cloned().collect();
            out.sort_by(|a, b| b.date_time.cmp(&a.date_time).then(b.id.cmp(&a.id)));
            Ok(out)
        }

        async fn find_for_owner(&self, owner: i32, id: i32) -> Result<Option<BookingView>, ServiceError> {
            Ok(self.rows.lock().unwrap().iter().find(|b| b.id == id && b.user_id == owner).cloned())
        }

        async fn insert(&self, owner: i32, fields: BookingFields) -> Result<BookingView, ServiceError> {
            let svc = self.service(fields.service_id)?.clone();
            let mut rows = self.rows.lock().unwrap();
            let view = BookingView {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                customer_name: fields.customer_name,
                address: fields.address,
                date_time: fields.date_time,
                service_id: svc.id,
                user_id: owner,
                status: BookingStatus::Pending,
                created_at: Utc::now(),
                service_name: svc.name,
                service_price: svc.price,
            };
            rows.push(view.clone());
            Ok(view)
        }

        async fn update_for_owner(&self, owner: i32, id: i32, fields: BookingFields, status: Option<BookingStatus>) -> Result<Option<BookingView>, ServiceError> {
            let svc = self.service(fields.service_id)?.clone();
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|b| b.id == id && b.user_id == owner) else { return Ok(None) };
            row.customer_name = fields.customer_name;
            row.address = fields.address;
            row.date_time = fields.date_time;
            row.service_id = svc.id;
            row.service_name = svc.name;
            row.service_price = svc.price;
            if let Some(s) = status { row.status = s; }
            Ok(Some(row.clone()))
        }

        async fn delete_for_owner(&self, owner: i32, id: i32) -> Result<bool, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|b| !(b.id == id && b.user_id == owner));
            Ok(rows.len() < before)
        }
    }
}
