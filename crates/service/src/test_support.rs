#![cfg(test)]
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect_with_config;

/// Fresh, migrated database per test: in-memory SQLite unless
/// `TEST_DATABASE_URL` points elsewhere.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let cfg = configs::DatabaseConfig { url, ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
