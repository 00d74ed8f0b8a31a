
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Fresh migrated in-memory SQLite database per test; seeded catalog included.
/// The single pooled connection keeps it alive until the pool is dropped.
pub async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
