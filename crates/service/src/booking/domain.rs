use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub use models::booking::BookingStatus;

/// A service reference as sent by clients: form selects submit ids as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceRef {
    Id(i64),
    Text(String),
}

impl ServiceRef {
    /// Positive id, or `None` when blank, zero or not a number.
    pub fn id(&self) -> Option<i32> {
        let raw = match self {
            ServiceRef::Id(n) => *n,
            ServiceRef::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        i32::try_from(raw).ok().filter(|id| *id > 0)
    }
}

impl From<i32> for ServiceRef {
    fn from(id: i32) -> Self { ServiceRef::Id(id.into()) }
}

impl From<String> for ServiceRef {
    fn from(s: String) -> Self { ServiceRef::Text(s) }
}

/// Create/update payload. All fields except `status` are required; missing
/// and blank values are reported together as a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingInput {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub service_id: Option<ServiceRef>,
    /// Only honoured on update; new bookings are always pending.
    #[serde(default)]
    pub status: Option<String>,
}

/// A booking joined with its service's name and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingView {
    pub id: i32,
    pub customer_name: String,
    pub address: String,
    pub date_time: NaiveDateTime,
    pub service_id: i32,
    pub user_id: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub service_name: String,
    pub service_price: f64,
}

impl BookingView {
    pub fn from_models(b: models::booking::Model, s: models::catalog::Model) -> Self {
        Self {
            id: b.id,
            customer_name: b.customer_name,
            address: b.address,
            date_time: b.date_time,
            service_id: b.service_id,
            user_id: b.user_id,
            status: b.status,
            created_at: b.created_at.with_timezone(&Utc),
            service_name: s.name,
            service_price: s.price,
        }
    }
}
