use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::errors::ModelError;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn map_model_err(e: ModelError) -> AuthError {
    match e {
        ModelError::Conflict(_) => AuthError::Conflict,
        ModelError::Validation(msg) => AuthError::Validation(msg),
        ModelError::Db(msg) => AuthError::Repository(msg),
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_username(&self.db, username)
            .await
            .map_err(map_model_err)?;
        Ok(res.map(|u| AuthUser { id: u.id, username: u.username }))
    }

    async fn create_user_with_password(
        &self,
        username: &str,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(|e| AuthError::Repository(e.to_string()))?;
        let created = models::user::create(&txn, username).await.map_err(map_model_err)?;
        models::user_credentials::create_for_user(&txn, created.id, password_hash, &password_algorithm)
            .await
            .map_err(map_model_err)?;
        txn.commit().await.map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(AuthUser { id: created.id, username: created.username })
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id)
            .await
            .map_err(map_model_err)?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn create_user_with_password_is_atomic_and_unique() -> Result<(), anyhow::Error> {
        let repo = SeaOrmAuthRepository::new(get_db().await?);

        let name = format!("carol_{}", uuid::Uuid::new_v4().simple());
        let u = repo.create_user_with_password(&name, "phc-hash".into(), "argon2".into()).await?;
        let found = repo.find_user_by_username(&name).await?.unwrap();
        assert_eq!(found, u);
        let creds = repo.get_credentials(u.id).await?.unwrap();
        assert_eq!(creds.password_hash, "phc-hash");

        let dup = repo.create_user_with_password(&name, "other".into(), "argon2".into()).await;
        assert!(matches!(dup, Err(AuthError::Conflict)));
        // credentials of the first registration are untouched
        assert_eq!(repo.get_credentials(u.id).await?.unwrap().password_hash, "phc-hash");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_yields_none() -> Result<(), anyhow::Error> {
        let repo = SeaOrmAuthRepository::new(get_db().await?);
        assert!(repo.find_user_by_username("nobody_with_no_account").await?.is_none());
        assert!(repo.get_credentials(i32::MAX).await?.is_none());
        Ok(())
    }
}
