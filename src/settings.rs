use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use url::Url;

use crate::client::{EmailClient, WhatsAppClient};
use crate::domain::EmailAddress;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email: EmailSettings,
    pub whatsapp: WhatsAppSettings,
    /// Staff account ensured at startup
    pub admin: Option<AdminSettings>,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        let path = env::current_dir()?.join("settings");
        // `APP_ENV` picks the runtime, defaulting to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }

    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(File::from(base_path.join("base")).required(true))
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

fn default_log_filter() -> String {
    "info".into()
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// `EnvFilter` directives for the tracing subscriber
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    host: String,
    name: String,
    username: String,
    password: Secret<String>,
    require_ssl: bool,
}

impl DatabaseSettings {
    /// The database connection options, without specifying the database name
    pub fn without_db(&self) -> PgConnectOptions {
        use secrecy::ExposeSecret;

        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .port(self.port)
            .host(&self.host)
            .ssl_mode(ssl_mode)
            .username(&self.username)
            .password(self.password.expose_secret())
    }
    /// The database connection options, with the database name
    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    sender: String,
    api_base_url: String,
    api_auth_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    send_delay_milliseconds: u64,
}

impl EmailSettings {
    /// The email address to send donor emails from
    pub fn sender(&self) -> anyhow::Result<EmailAddress> {
        self.sender
            .parse()
            .context("Failed to parse email sender address")
    }
    /// The email REST API timeout duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// Pause between two sends of a batch
    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_milliseconds)
    }
    /// The base URL for the email REST service
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse email base URL")
    }

    pub fn client(&self) -> anyhow::Result<EmailClient> {
        EmailClient::new(
            self.sender()?,
            self.api_timeout(),
            self.api_base_url()?,
            self.api_auth_token.clone().into(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct WhatsAppSettings {
    api_base_url: String,
    api_auth_token: Secret<String>,
    phone_number_id: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl WhatsAppSettings {
    pub fn client(&self) -> anyhow::Result<WhatsAppClient> {
        let api_base_url =
            Url::parse(&self.api_base_url).context("Failed to parse WhatsApp base URL")?;
        WhatsAppClient::new(
            Duration::from_millis(self.api_timeout_milliseconds),
            api_base_url,
            &self.phone_number_id,
            self.api_auth_token.clone(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminSettings {
    pub email: String,
    pub password: Secret<String>,
}
