use std::sync::Arc;

use tracing::{info, instrument};

use models::booking::{parse_date_time, BookingFields};

use super::domain::{BookingInput, BookingStatus, BookingView};
use super::repository::BookingRepository;
use crate::catalog::CatalogRepository;
use crate::errors::ServiceError;

const FIELDS_REQUIRED: &str = "All fields are required";
const NOT_FOUND_OR_FORBIDDEN: &str = "Booking not found or not authorized";

/// Owner-scoped booking management. A booking that exists but belongs to
/// someone else is reported exactly like one that does not exist.
pub struct BookingService<B: BookingRepository, C: CatalogRepository> {
    bookings: Arc<B>,
    catalog: Arc<C>,
}

impl<B: BookingRepository, C: CatalogRepository> BookingService<B, C> {
    pub fn new(bookings: Arc<B>, catalog: Arc<C>) -> Self { Self { bookings, catalog } }

    /// Bookings of `owner`, latest scheduled first.
    pub async fn list(&self, owner: i32) -> Result<Vec<BookingView>, ServiceError> {
        self.bookings.list_for_owner(owner).await
    }

    pub async fn get(&self, owner: i32, id: i32) -> Result<BookingView, ServiceError> {
        self.bookings
            .find_for_owner(owner, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND_OR_FORBIDDEN.into()))
    }

    /// Create a pending booking for `owner`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::booking::{BookingService, domain::{BookingInput, BookingStatus}, repository::mock::MockBookingRepository};
    /// use service::catalog::mock::MockCatalogRepository;
    /// let catalog = MockCatalogRepository::default();
    /// let bookings = MockBookingRepository::new(catalog.items.clone());
    /// let svc = BookingService::new(Arc::new(bookings), Arc::new(catalog));
    /// let input = BookingInput {
    ///     customer_name: Some("Ada".into()),
    ///     address: Some("1 Main St".into()),
    ///     date_time: Some("2024-06-01T09:30".into()),
    ///     service_id: Some("2".to_string().into()),
    ///     status: None,
    /// };
    /// let created = tokio_test::block_on(svc.create(7, input)).unwrap();
    /// assert_eq!(created.user_id, 7);
    /// assert_eq!(created.service_name, "Carpet Cleaning");
    /// assert_eq!(created.status, BookingStatus::Pending);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, owner: i32, input: BookingInput) -> Result<BookingView, ServiceError> {
        let fields = self.validate(&input).await?;
        let created = self.bookings.insert(owner, fields).await?;
        info!(booking_id = created.id, service_id = created.service_id, event = "booking_created", "booking created");
        Ok(created)
    }

    /// Replace the writable fields of an owned booking. `status` is applied
    /// only when present; the owner never changes.
    #[instrument(skip(self, input))]
    pub async fn update(&self, owner: i32, id: i32, input: BookingInput) -> Result<BookingView, ServiceError> {
        let fields = self.validate(&input).await?;
        let status = input
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<BookingStatus>)
            .transpose()?;

        let updated = self.bookings
            .update_for_owner(owner, id, fields, status)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND_OR_FORBIDDEN.into()))?;
        info!(booking_id = id, status = %updated.status, event = "booking_updated", "booking updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner: i32, id: i32) -> Result<(), ServiceError> {
        if !self.bookings.delete_for_owner(owner, id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND_OR_FORBIDDEN.into()));
        }
        info!(booking_id = id, event = "booking_deleted", "booking deleted");
        Ok(())
    }

    async fn validate(&self, input: &BookingInput) -> Result<BookingFields, ServiceError> {
        let text = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let (Some(customer_name), Some(address), Some(raw_when), Some(service_ref)) =
            (text(&input.customer_name), text(&input.address), text(&input.date_time), input.service_id.as_ref())
        else {
            return Err(ServiceError::Validation(FIELDS_REQUIRED.into()));
        };

        let service_id = service_ref.id().ok_or_else(|| ServiceError::Validation(FIELDS_REQUIRED.into()))?;
        let date_time = parse_date_time(&raw_when)?;
        if self.catalog.get(service_id).await?.is_none() {
            return Err(ServiceError::Validation(format!("Unknown service: {service_id}")));
        }
        Ok(BookingFields { customer_name, address, date_time, service_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::domain::ServiceRef;
    use crate::booking::repository::{mock::MockBookingRepository, SeaOrmBookingRepository};
    use crate::catalog::{mock::MockCatalogRepository, SeaOrmCatalogRepository};
    use crate::test_support::get_db;

    type MockBookings = BookingService<MockBookingRepository, MockCatalogRepository>;

    fn svc() -> MockBookings {
        let catalog = MockCatalogRepository::default();
        let bookings = MockBookingRepository::new(catalog.items.clone());
        BookingService::new(Arc::new(bookings), Arc::new(catalog))
    }

    fn input(name: &str, when: &str, service: impl Into<ServiceRef>) -> BookingInput {
        BookingInput {
            customer_name: Some(name.into()),
            address: Some("12 Grimmauld Place".into()),
            date_time: Some(when.into()),
            service_id: Some(service.into()),
            status: None,
        }
    }

    #[tokio::test]
    async fn missing_or_blank_fields_rejected() {
        let svc = svc();
        let mut cases = vec![BookingInput::default()];
        let mut blank_name = input("x", "2024-06-01T10:00", 1);
        blank_name.customer_name = Some("   ".into());
        cases.push(blank_name);
        let mut no_address = input("x", "2024-06-01T10:00", 1);
        no_address.address = None;
        cases.push(no_address);
        let mut no_service = input("x", "2024-06-01T10:00", 1);
        no_service.service_id = None;
        cases.push(no_service);
        cases.push(input("x", "2024-06-01T10:00", ServiceRef::Text(String::new())));

        for case in cases {
            match svc.create(1, case).await {
                Err(ServiceError::Validation(msg)) => assert_eq!(msg, FIELDS_REQUIRED),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert!(svc.list(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_date_and_unknown_service_rejected() {
        let svc = svc();
        assert!(matches!(svc.create(1, input("x", "tomorrow", 1)).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.create(1, input("x", "2024-06-01T10:00", 99)).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn update_validates_fields_and_keeps_the_stored_row() {
        let svc = svc();
        let b = svc.create(1, input("Neville", "2024-06-01T10:00", 1)).await.unwrap();

        let mut blank_address = input("Neville", "2024-06-02T10:00", 2);
        blank_address.address = Some(" ".into());
        let mut no_date = input("Neville", "2024-06-02T10:00", 2);
        no_date.date_time = None;
        for case in [BookingInput::default(), blank_address, no_date] {
            match svc.update(1, b.id, case).await {
                Err(ServiceError::Validation(msg)) => assert_eq!(msg, FIELDS_REQUIRED),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert!(matches!(
            svc.update(1, b.id, input("Neville", "2024-06-02T10:00", 99)).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            svc.update(1, b.id, input("Neville", "someday", 2)).await,
            Err(ServiceError::Validation(_))
        ));

        assert_eq!(svc.get(1, b.id).await.unwrap(), b);
    }

    #[tokio::test]
    async fn bookings_are_isolated_per_owner() {
        let svc = svc();
        let mine = svc.create(1, input("Harry", "2024-06-01T10:00", 1)).await.unwrap();

        assert!(svc.list(2).await.unwrap().is_empty());
        assert!(matches!(svc.get(2, mine.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.update(2, mine.id, input("Draco", "2024-06-02T10:00", 2)).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(svc.delete(2, mine.id).await, Err(ServiceError::NotFound(_))));

        // untouched by the failed attempts
        assert_eq!(svc.get(1, mine.id).await.unwrap(), mine);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_optionally_status() {
        let svc = svc();
        let b = svc.create(1, input("Ron", "2024-06-01T10:00", 1)).await.unwrap();

        let mut change = input("Ronald", "2024-06-03 15:00", "3".to_string());
        change.status = Some("confirmed".into());
        let updated = svc.update(1, b.id, change).await.unwrap();
        assert_eq!(updated.customer_name, "Ronald");
        assert_eq!(updated.service_name, "Window Cleaning");
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.user_id, 1);

        // absent status keeps the current one
        let again = svc.update(1, b.id, input("Ronald", "2024-06-03 15:00", 3)).await.unwrap();
        assert_eq!(again.status, BookingStatus::Confirmed);

        let mut bogus = input("Ronald", "2024-06-03 15:00", 3);
        bogus.status = Some("archived".into());
        assert!(matches!(svc.update(1, b.id, bogus).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn list_is_latest_first_and_delete_is_final() {
        let svc = svc();
        let a = svc.create(1, input("A", "2024-06-01T10:00", 1)).await.unwrap();
        let b = svc.create(1, input("B", "2024-09-01T10:00", 2)).await.unwrap();
        let ids: Vec<_> = svc.list(1).await.unwrap().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, [b.id, a.id]);

        svc.delete(1, a.id).await.unwrap();
        assert!(matches!(svc.delete(1, a.id).await, Err(ServiceError::NotFound(_))));
        assert_eq!(svc.list(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seaorm_repositories_round_trip() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = models::user::create(&db, &format!("owner-{}", uuid::Uuid::new_v4())).await?.id;
        let svc = BookingService::new(
            Arc::new(SeaOrmBookingRepository::new(db.clone())),
            Arc::new(SeaOrmCatalogRepository::new(db)),
        );

        let created = svc.create(owner, input("Luna", "2024-06-01T10:00:00Z", 5)).await?;
        assert_eq!(created.service_name, "Bathroom Cleaning");
        assert_eq!(created.service_price, 70.0);
        assert_eq!(svc.get(owner, created.id).await?, created);

        let mut change = input("Luna", "2024-06-01T11:00", 4);
        change.status = Some("cancelled".into());
        let updated = svc.update(owner, created.id, change).await?;
        assert_eq!(updated.status, BookingStatus::Cancelled);
        assert_eq!(updated.service_name, "Kitchen Cleaning");

        assert!(matches!(svc.get(owner + 1, created.id).await, Err(ServiceError::NotFound(_))));
        svc.delete(owner, created.id).await?;
        assert!(svc.list(owner).await?.is_empty());
        Ok(())
    }
}
