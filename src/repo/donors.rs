use async_trait::async_trait;

use chrono::{DateTime, NaiveDate, Utc};

use serde::Deserialize;

use sqlx::types::Json;
use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::{Donor, MemorialDate, NewDonor};
use crate::error::{Error, Result};

use super::{collect_valid, expect_affected};

#[async_trait]
pub trait DonorRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Donor>>;
    async fn fetch(&self, id: Uuid) -> Result<Option<Donor>>;
    async fn insert(&self, new_donor: &NewDonor) -> Result<Uuid>;
    async fn update(&self, id: Uuid, donor: &NewDonor) -> Result<()>;
    /// Donations of the donor go with it
    async fn delete(&self, id: Uuid) -> Result<()>;
}

const SELECT_DONORS: &str = "select id, name, email, phone, donor_type, status, birth_date, \
     anniversary_date, social_media_handle, memorial_dates, created_at from donors";

#[derive(Debug, sqlx::FromRow)]
struct DonorRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    donor_type: String,
    status: String,
    birth_date: Option<NaiveDate>,
    anniversary_date: Option<NaiveDate>,
    social_media_handle: Option<String>,
    memorial_dates: Option<Json<Vec<MemorialDateRow>>>,
    created_at: DateTime<Utc>,
}

/// Memorial entries are free-form JSON in the store
#[derive(Debug, Deserialize)]
struct MemorialDateRow {
    tag: Option<String>,
    date: Option<String>,
}

impl TryFrom<DonorRow> for Donor {
    type Error = Error;

    fn try_from(row: DonorRow) -> Result<Self> {
        let memorial_dates = row
            .memorial_dates
            .map(|json| json.0)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| {
                let date = entry.date?.parse::<NaiveDate>().ok()?;
                Some(MemorialDate {
                    tag: entry.tag.unwrap_or_default(),
                    date,
                })
            })
            .collect();

        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            donor_type: row.donor_type.parse()?,
            status: row.status.parse()?,
            birth_date: row.birth_date,
            anniversary_date: row.anniversary_date,
            social_media_handle: row.social_media_handle,
            memorial_dates,
            created_at: row.created_at,
        })
    }
}

/// Donor repository backed by the `donors` table
pub struct PgDonorRepo {
    pool: PgPool,
}

impl PgDonorRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonorRepo for PgDonorRepo {
    #[tracing::instrument(name = "Fetch all donors", skip(self))]
    async fn list(&self) -> Result<Vec<Donor>> {
        let rows: Vec<DonorRow> =
            sqlx::query_as(&format!("{} order by created_at desc", SELECT_DONORS))
                .fetch_all(&self.pool)
                .await?;

        Ok(collect_valid("donor", rows))
    }

    #[tracing::instrument(name = "Fetch a donor by id", skip(self))]
    async fn fetch(&self, id: Uuid) -> Result<Option<Donor>> {
        let row: Option<DonorRow> = sqlx::query_as(&format!("{} where id=$1", SELECT_DONORS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Donor::try_from).transpose()
    }

    #[tracing::instrument(name = "Insert donor", skip(self))]
    async fn insert(&self, new_donor: &NewDonor) -> Result<Uuid> {
        let id = sqlx::query_scalar(
            "insert into donors(name, email, phone, donor_type, status, birth_date, \
             anniversary_date, social_media_handle, memorial_dates) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9) returning id",
        )
        .bind(new_donor.name.as_ref())
        .bind(new_donor.email.as_ref())
        .bind(new_donor.phone.as_ref())
        .bind(new_donor.donor_type.as_str())
        .bind(new_donor.status.as_str())
        .bind(new_donor.birth_date)
        .bind(new_donor.anniversary_date)
        .bind(new_donor.social_media_handle.as_deref())
        .bind(Json(&new_donor.memorial_dates))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(name = "Update donor", skip(self))]
    async fn update(&self, id: Uuid, donor: &NewDonor) -> Result<()> {
        let result = sqlx::query(
            "update donors set name=$2, email=$3, phone=$4, donor_type=$5, status=$6, \
             birth_date=$7, anniversary_date=$8, social_media_handle=$9, memorial_dates=$10 \
             where id=$1",
        )
        .bind(id)
        .bind(donor.name.as_ref())
        .bind(donor.email.as_ref())
        .bind(donor.phone.as_ref())
        .bind(donor.donor_type.as_str())
        .bind(donor.status.as_str())
        .bind(donor.birth_date)
        .bind(donor.anniversary_date)
        .bind(donor.social_media_handle.as_deref())
        .bind(Json(&donor.memorial_dates))
        .execute(&self.pool)
        .await?;

        expect_affected(result, "Donor", id)
    }

    #[tracing::instrument(name = "Delete donor", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("delete from donors where id=$1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "Donor", id)
    }
}
