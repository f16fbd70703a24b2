use std::net::TcpListener;

use anyhow::Context;

use sqlx::postgres::PgPoolOptions;

use donor_desk::app;
use donor_desk::auth::hash_password;
use donor_desk::dispatch::SendDelay;
use donor_desk::repo::{NewUser, Repositories};
use donor_desk::settings::{AdminSettings, Settings};
use donor_desk::telemetry::{create_subscriber, set_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let subscriber = create_subscriber(settings.app.log_filter().into(), std::io::stdout);
    set_subscriber(subscriber)?;

    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_with(settings.database.with_db())
        .await
        .context("Failed to connect to the database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repos = Repositories::postgres(pool);
    if let Some(admin) = &settings.admin {
        ensure_admin(&repos, admin).await?;
    }

    let email_client = settings.email.client()?;
    if !email_client.has_credentials() {
        tracing::warn!("No email API token configured, batch email is disabled");
    }
    let whatsapp_client = settings.whatsapp.client()?;

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    app::run(
        listener,
        repos,
        email_client,
        whatsapp_client,
        SendDelay(settings.email.send_delay()),
    )?
    .await
    .context("Failed to run app")
}

/// Create the configured staff account unless it already exists
async fn ensure_admin(repos: &Repositories, admin: &AdminSettings) -> anyhow::Result<()> {
    let email = admin
        .email
        .parse()
        .context("Failed to parse admin email address")?;
    if repos.users.fetch_credentials_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)?;
    repos
        .users
        .insert(&NewUser {
            email,
            password_hash,
        })
        .await?;
    tracing::info!("Created admin account {}", admin.email);
    Ok(())
}
