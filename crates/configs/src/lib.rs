use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Token signing and bootstrap account settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Account created at startup when missing; disabled with an empty username.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cleaning_service.db?mode=rwc";
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";
/// One hundred years.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 100;

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_token_ttl_hours() -> i64 { 24 }
fn default_admin_username() -> String { "admin".into() }
fn default_admin_password() -> String { "admin123".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` when present, otherwise start from defaults; then
    /// apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        let port = std::env::var("SERVER_PORT").or_else(|_| std::env::var("PORT"));
        if let Some(p) = port.ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = p;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.url = url;
            }
        }
        if self.url.trim().is_empty() {
            self.url = DEFAULT_DATABASE_URL.to_string();
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthSettings {
    pub fn normalize_from_env(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.is_empty() {
                self.jwt_secret = secret;
            }
        }
        if self.jwt_secret.is_empty() {
            self.jwt_secret = DEV_JWT_SECRET.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        if self.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(anyhow!("auth.token_ttl_hours must be at most {MAX_TOKEN_TTL_HOURS}"));
        }
        if !self.admin_username.trim().is_empty() && self.admin_password.is_empty() {
            return Err(anyhow!("auth.admin_password is required when auth.admin_username is set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.auth.token_ttl_hours, 24);
        assert_eq!(cfg.auth.admin_username, "admin");
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn sections_are_parsed() {
        let cfg = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8088

            [database]
            url = "postgres://u:p@localhost/bookings"
            max_connections = 5

            [auth]
            jwt_secret = "s3cret"
            token_ttl_hours = 2
            admin_username = ""
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.min_connections, 1);
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        assert_eq!(cfg.auth.token_ttl_hours, 2);
        assert!(cfg.auth.validate().is_ok());
    }

    #[test]
    fn database_url_scheme_is_checked() {
        let mut db = DatabaseConfig { url: "mysql://localhost/x".into(), ..Default::default() };
        assert!(db.validate().is_err());
        db.url = "sqlite://bookings.db?mode=rwc".into();
        assert!(db.validate().is_ok());
        assert!(db.is_sqlite());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let db = DatabaseConfig { url: DEFAULT_DATABASE_URL.into(), min_connections: 5, max_connections: 2, ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn non_positive_ttl_rejected() {
        let auth = AuthSettings { token_ttl_hours: 0, ..Default::default() };
        assert!(auth.validate().is_err());
    }

    #[test]
    fn example_file_is_valid() {
        let mut cfg = parse(include_str!("../../../config.example.toml")).unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert!(cfg.database.is_sqlite());
        assert!(cfg.database.validate().is_ok());
        assert!(cfg.server.normalize().is_ok());
        assert!(cfg.auth.validate().is_ok());
    }

    #[test]
    fn oversized_ttl_rejected() {
        let auth = AuthSettings { token_ttl_hours: 10_000_000_000, ..Default::default() };
        assert!(auth.validate().is_err());
        let auth = AuthSettings { token_ttl_hours: MAX_TOKEN_TTL_HOURS, ..Default::default() };
        assert!(auth.validate().is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let mut s = ServerConfig { port: 0, ..Default::default() };
        assert!(s.normalize().is_err());
    }
}
