use async_trait::async_trait;

use secrecy::Secret;

use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::EmailAddress;
use crate::error::Result;

#[derive(Debug)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub password_hash: Secret<String>,
}

/// Staff accounts allowed to use the API
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert(&self, new_user: &NewUser) -> Result<Uuid>;
    async fn fetch_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>>;
}

pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    password_hash: String,
}

#[async_trait]
impl UserRepo for PgUserRepo {
    #[tracing::instrument("Insert a new user record", skip(self))]
    async fn insert(&self, new_user: &NewUser) -> Result<Uuid> {
        let id = sqlx::query_scalar(
            "insert into users(email, password_hash) values ($1, $2) returning id",
        )
        .bind(new_user.email.as_ref())
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument("Fetch user credentials", skip(self))]
    async fn fetch_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>> {
        let row: Option<CredentialsRow> =
            sqlx::query_as("select id, password_hash from users where email=$1")
                .bind(email.as_ref())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|row| UserCredentials {
            id: row.id,
            password_hash: Secret::new(row.password_hash),
        }))
    }
}
