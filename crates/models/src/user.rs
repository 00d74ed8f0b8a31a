use sea_orm::{entity::prelude::*, ConnectionTrait, Set, SqlErr};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Credentials,
    Booking,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Credentials => Entity::has_one(crate::user_credentials::Entity).into(),
            Relation::Booking => Entity::has_many(crate::booking::Entity).into(),
        }
    }
}

impl Related<crate::user_credentials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credentials.def()
    }
}

impl Related<crate::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const USERNAME_MAX_LEN: usize = 128;

/// Trim and check a username; returns the normalized value.
pub fn validate_username(username: &str) -> Result<String, errors::ModelError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("username required".into()));
    }
    if trimmed.chars().count() > USERNAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("username longer than {USERNAME_MAX_LEN} characters")));
    }
    Ok(trimmed.to_string())
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn create<C: ConnectionTrait>(db: &C, username: &str) -> Result<Model, errors::ModelError> {
    let username = validate_username(username)?;
    let am = ActiveModel {
        username: Set(username),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => errors::ModelError::Conflict("username already exists".into()),
        _ => errors::ModelError::Db(e.to_string()),
    })
}
