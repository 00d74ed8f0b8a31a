use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use chrono::Duration;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::{AppConfig, AuthSettings};
use service::auth::AuthConfig;

use crate::routes;
use crate::state::ServerState;

/// Browser clients are served from another origin.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

pub fn auth_config(settings: &AuthSettings) -> AuthConfig {
    AuthConfig::new(settings.jwt_secret.clone()).with_token_ttl(Duration::hours(settings.token_ttl_hours))
}

/// Connect, migrate, seed the admin account and assemble handler state.
pub async fn prepare_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .context("connect database")?;
    migration::Migrator::up(&db, None).await.context("run migrations")?;

    let state = ServerState::new(db, auth_config(&cfg.auth));
    if cfg.auth.admin_username.trim().is_empty() {
        return Ok(state);
    }
    match state.auth.ensure_user(&cfg.auth.admin_username, &cfg.auth.admin_password).await? {
        Some(admin) => info!(user_id = admin.id, username = %admin.username, event = "admin_seeded", "default admin account created"),
        None => info!(username = %cfg.auth.admin_username, "admin account present"),
    }
    Ok(state)
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cfg.server.host, cfg.server.port))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: load config, build the app and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = AppConfig::load_and_validate()?;
    if cfg.auth.jwt_secret == configs::DEV_JWT_SECRET {
        warn!("JWT_SECRET not set; using the development secret");
    }

    let state = prepare_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await.with_context(|| format!("bind {addr}"))?;
    info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
