use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, Claims, Identity, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub password_algorithm: String,
}

impl AuthConfig {
    /// Argon2 hashing and 24h tokens signed with `jwt_secret`.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl: Duration::hours(24), password_algorithm: "argon2".into() }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password and sign them in.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let input = RegisterInput { username: "alice".into(), password: "Secret123".into() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.username, "alice");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        let (username, password) = require_credentials(&input.username, &input.password)?;
        let username = models::user::validate_username(username).map_err(|e| match e {
            models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
            other => AuthError::Repository(other.to_string()),
        })?;

        if let Some(existing) = self.repo.find_user_by_username(&username).await? {
            debug!(user_id = existing.id, "user exists");
            return Err(AuthError::Conflict);
        }

        // fail before persisting anything if no token could be issued
        self.expiry_from(Utc::now())?;
        let hash = hash_password(password)?;
        let user = self.repo
            .create_user_with_password(&username, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = user.id, username = %user.username, event = "user_registered", "user registered");

        let token = self.issue_token(&user)?;
        Ok(AuthSession { token, user })
    }

    /// Authenticate a user and issue a token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "u".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "u".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "u");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let (username, password) = require_credentials(&input.username, &input.password)?;

        let user = self.repo
            .find_user_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
            warn!(user_id = user.id, event = "login_failed", "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, event = "user_logged_in", "login succeeded");
        Ok(AuthSession { token, user })
    }

    /// Validate a bearer token and return the identity it carries.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
            debug!(err = %e, "token validation failed");
            AuthError::InvalidToken
        })?;
        let user_id = data.claims.sub.parse::<i32>().map_err(|_| AuthError::InvalidToken)?;
        Ok(Identity { user_id, username: data.claims.username })
    }

    /// Verify the value of an `Authorization` header (`Bearer <token>`).
    pub fn verify_authorization(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.map(str::trim).filter(|h| !h.is_empty()).ok_or(AuthError::MissingToken)?;
        let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::InvalidToken);
        }
        // `Bearer` with nothing after it counts as no token
        self.verify(token)
    }

    /// Create `username` with `password` unless it already exists.
    /// Returns the new user, or `None` when nothing was created.
    #[instrument(skip(self, password))]
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<Option<AuthUser>, AuthError> {
        if self.repo.find_user_by_username(username.trim()).await?.is_some() {
            return Ok(None);
        }
        let input = RegisterInput { username: username.to_string(), password: password.to_string() };
        match self.register(input).await {
            Ok(session) => Ok(Some(session.user)),
            Err(AuthError::Conflict) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, AuthError> {
        now.checked_add_signed(self.cfg.token_ttl)
            .ok_or_else(|| AuthError::TokenError(format!("token ttl out of range: {}", self.cfg.token_ttl)))
    }

    fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = self.expiry_from(now)?;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

fn require_credentials<'a>(username: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AuthError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AuthError::Validation("Username and password are required".into()));
    }
    Ok((username, password))
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string();
    Ok(hash)
}
