use std::future::Future;
use std::pin::Pin;

use actix_web::{dev, web, FromRequest, HttpRequest};

use anyhow::Context;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use secrecy::Secret;

use uuid::Uuid;

use crate::domain::EmailAddress;
use crate::error::{RestError, RestResult};
use crate::repo::{Repositories, UserRepo};
use crate::telemetry::spawn_blocking_with_tracing;

use super::Credentials;

/// Extractor admitting only requests carrying valid staff credentials
#[derive(Debug)]
pub struct Administrator(Uuid);

impl FromRequest for Administrator {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let repos = req
                .app_data::<web::Data<Repositories>>()
                .context("Repositories not registered for application")?
                .clone();
            let creds = Credentials::from_headers(req.headers()).map_err(unauthorized)?;
            let user_id = validate_credentials(repos.users.as_ref(), creds).await?;
            Ok(Administrator(user_id))
        })
    }
}

impl AsRef<Uuid> for Administrator {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

fn unauthorized(error: anyhow::Error) -> RestError {
    tracing::info!(error.cause_chain = ?error, "Rejected credentials");
    RestError::Unauthorized("Invalid credentials".into())
}

#[tracing::instrument("Validate credentials", skip(users, credentials))]
async fn validate_credentials(users: &dyn UserRepo, credentials: Credentials) -> RestResult<Uuid> {
    let email: EmailAddress = credentials
        .username
        .parse()
        .map_err(|_| RestError::Unauthorized("Invalid credentials".into()))?;

    let user = users
        .fetch_credentials_by_email(&email)
        .await?
        .context("No user stored for email")
        .map_err(unauthorized)?;

    let password = credentials.password;
    spawn_blocking_with_tracing(move || verify_password_hash(password, user.password_hash))
        .await
        .context("Failed to spawn blocking task")??;

    Ok(user.id)
}

/// PHC string of an argon2 hash of `password` with a random salt
pub fn hash_password(password: &Secret<String>) -> anyhow::Result<String> {
    use secrecy::ExposeSecret;

    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .context("Failed to hash password")?;
    Ok(hash.to_string())
}

#[tracing::instrument("Verify password hash", skip(password, password_hash))]
fn verify_password_hash(password: Secret<String>, password_hash: Secret<String>) -> RestResult<()> {
    use secrecy::ExposeSecret;

    let password_hash = PasswordHash::new(password_hash.expose_secret())
        .context("Failed to parse stored password hash")?;

    Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &password_hash)
        .context("Failed to verify password hash")
        .map_err(unauthorized)?;

    Ok(())
}
