use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::debug;

use configs::DatabaseConfig;

/// Connect with pool settings taken from config.
///
/// SQLite is limited to a single pooled connection so that writes are
/// serialized and in-memory databases stay alive for the pool's lifetime.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    let (min, max) = if cfg.is_sqlite() { (1, 1) } else { (cfg.min_connections, cfg.max_connections) };
    opts.max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    debug!(sqlite = cfg.is_sqlite(), max_connections = max, "connecting database");
    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Connect to `url` with default pool settings.
pub async fn connect(url: &str) -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: url.to_string(), ..Default::default() };
    connect_with_config(&cfg).await
}
