use async_trait::async_trait;

use chrono::{DateTime, Utc};

use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::{OrgSettings, OrgSettingsUpdate};
use crate::error::Result;

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn fetch(&self) -> Result<Option<OrgSettings>>;
    /// Overwrite the settings row, creating it when the table is empty
    async fn update(&self, settings: &OrgSettingsUpdate) -> Result<OrgSettings>;
}

const SETTINGS_COLUMNS: &str = "id, org_name, org_email, org_phone, org_address, website, \
     upi_id, razorpay_key, notifications_enabled, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    id: Uuid,
    org_name: String,
    org_email: Option<String>,
    org_phone: Option<String>,
    org_address: Option<String>,
    website: Option<String>,
    upi_id: Option<String>,
    razorpay_key: Option<String>,
    notifications_enabled: bool,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for OrgSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            id: row.id,
            org_name: row.org_name,
            org_email: row.org_email,
            org_phone: row.org_phone,
            org_address: row.org_address,
            website: row.website,
            upi_id: row.upi_id,
            razorpay_key: row.razorpay_key,
            notifications_enabled: row.notifications_enabled,
            updated_at: row.updated_at,
        }
    }
}

/// Settings repository backed by the single-row `settings` table
pub struct PgSettingsRepo {
    pool: PgPool,
}

impl PgSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepo for PgSettingsRepo {
    #[tracing::instrument(name = "Fetch organisation settings", skip(self))]
    async fn fetch(&self) -> Result<Option<OrgSettings>> {
        let row: Option<SettingsRow> = sqlx::query_as(&format!(
            "select {} from settings order by updated_at limit 1",
            SETTINGS_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OrgSettings::from))
    }

    #[tracing::instrument(name = "Update organisation settings", skip(self, settings))]
    async fn update(&self, settings: &OrgSettingsUpdate) -> Result<OrgSettings> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<Uuid> =
            sqlx::query_scalar("select id from settings order by updated_at limit 1 for update")
                .fetch_optional(&mut *tx)
                .await?;

        let sql = match existing {
            Some(_) => format!(
                "update settings set org_name=$2, org_email=$3, org_phone=$4, org_address=$5, \
                 website=$6, upi_id=$7, razorpay_key=$8, notifications_enabled=$9, \
                 updated_at=now() where id=$1 returning {}",
                SETTINGS_COLUMNS
            ),
            None => format!(
                "insert into settings(id, org_name, org_email, org_phone, org_address, website, \
                 upi_id, razorpay_key, notifications_enabled) \
                 values ($1, $2, $3, $4, $5, $6, $7, $8, $9) returning {}",
                SETTINGS_COLUMNS
            ),
        };

        let row: SettingsRow = sqlx::query_as(&sql)
            .bind(existing.unwrap_or_else(Uuid::new_v4))
            .bind(&settings.org_name)
            .bind(settings.org_email.as_ref().map(|email| email.as_ref()))
            .bind(&settings.org_phone)
            .bind(&settings.org_address)
            .bind(settings.website.as_ref().map(|url| url.as_str()))
            .bind(&settings.upi_id)
            .bind(&settings.razorpay_key)
            .bind(settings.notifications_enabled)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}
