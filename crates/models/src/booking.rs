use std::fmt;
use std::str::FromStr;

use chrono::{DateTime as ChronoDateTime, NaiveDateTime, Utc};
use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{catalog, errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_name: String,
    pub address: String,
    pub date_time: DateTime,
    pub service_id: i32,
    pub user_id: i32,
    pub status: BookingStatus,
    pub created_at: DateTimeWithTimeZone,
}

/// Lifecycle of a booking. New bookings start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(errors::ModelError::Validation(format!("invalid status: {other}"))),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Service,
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(catalog::Entity)
                .from(Column::ServiceId)
                .to(catalog::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<catalog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Validated, writable booking fields. The owner is passed separately and
/// is never part of an update.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingFields {
    pub customer_name: String,
    pub address: String,
    pub date_time: NaiveDateTime,
    pub service_id: i32,
}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a scheduled time as sent by browser `datetime-local` inputs,
/// plain ISO-8601 or RFC 3339 (converted to UTC).
pub fn parse_date_time(raw: &str) -> Result<NaiveDateTime, errors::ModelError> {
    let raw = raw.trim();
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    ChronoDateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .map_err(|_| errors::ModelError::Validation(format!("invalid date_time: {raw}")))
}

pub type WithService = (Model, Option<catalog::Model>);

/// All bookings of `owner`, latest scheduled first, joined with their service.
pub async fn list_for_owner<C: ConnectionTrait>(db: &C, owner: i32) -> Result<Vec<WithService>, errors::ModelError> {
    let rows = Entity::find()
        .find_also_related(catalog::Entity)
        .filter(Column::UserId.eq(owner))
        .order_by_desc(Column::DateTime)
        .order_by_desc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_for_owner<C: ConnectionTrait>(db: &C, owner: i32, id: i32) -> Result<Option<WithService>, errors::ModelError> {
    let row = Entity::find()
        .find_also_related(catalog::Entity)
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(owner))
        .one(db)
        .await?;
    Ok(row)
}

pub async fn create<C: ConnectionTrait>(db: &C, owner: i32, fields: BookingFields) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        customer_name: Set(fields.customer_name),
        address: Set(fields.address),
        date_time: Set(fields.date_time),
        service_id: Set(fields.service_id),
        user_id: Set(owner),
        status: Set(BookingStatus::Pending),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Update a booking only when it belongs to `owner`; returns whether a row matched.
pub async fn update_for_owner<C: ConnectionTrait>(
    db: &C,
    owner: i32,
    id: i32,
    fields: BookingFields,
    status: Option<BookingStatus>,
) -> Result<bool, errors::ModelError> {
    let mut update = Entity::update_many()
        .col_expr(Column::CustomerName, Expr::value(fields.customer_name))
        .col_expr(Column::Address, Expr::value(fields.address))
        .col_expr(Column::DateTime, Expr::value(fields.date_time))
        .col_expr(Column::ServiceId, Expr::value(fields.service_id));
    if let Some(status) = status {
        update = update.col_expr(Column::Status, Expr::value(status.as_str()));
    }
    let res = update
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(owner))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Delete a booking only when it belongs to `owner`; returns whether a row matched.
pub async fn delete_for_owner<C: ConnectionTrait>(db: &C, owner: i32, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(owner))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browser_datetime_local() {
        let dt = parse_date_time("2024-06-01T09:30").unwrap();
        assert_eq!(dt.to_string(), "2024-06-01 09:30:00");
    }

    #[test]
    fn parses_seconds_and_space_separator() {
        assert!(parse_date_time("2024-06-01T09:30:15").is_ok());
        assert!(parse_date_time("2024-06-01 09:30:15").is_ok());
        assert!(parse_date_time("2024-06-01 09:30").is_ok());
    }

    #[test]
    fn rfc3339_is_converted_to_utc() {
        let dt = parse_date_time("2024-06-01T11:30:00+02:00").unwrap();
        assert_eq!(dt.to_string(), "2024-06-01 09:30:00");
    }

    #[test]
    fn garbage_date_time_rejected() {
        assert!(matches!(parse_date_time("tomorrow"), Err(errors::ModelError::Validation(_))));
        assert!(parse_date_time("").is_err());
    }

    #[test]
    fn status_parsing() {
        assert_eq!("Confirmed".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert_eq!("canceled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!("done".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
    }
}
