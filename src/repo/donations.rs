use async_trait::async_trait;

use chrono::NaiveDate;

use rust_decimal::Decimal;

use serde::Deserialize;

use sqlx::types::Json;
use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::{Donation, DonationKind, InKindItem, NewDonation};
use crate::error::{Error, Result};

use super::collect_valid;

#[async_trait]
pub trait DonationRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Donation>>;
    async fn list_by_campaign(&self, campaign_id: Uuid) -> Result<Vec<Donation>>;
    async fn list_by_donor(&self, donor_id: Uuid) -> Result<Vec<Donation>>;
    async fn insert(&self, new_donation: &NewDonation) -> Result<Uuid>;
}

const SELECT_DONATIONS: &str = "select id, donor_id, campaign_id, amount, donation_type, \
     payment_method, items, date from donations";

#[derive(Debug, sqlx::FromRow)]
struct DonationRow {
    id: Uuid,
    donor_id: Uuid,
    campaign_id: Option<Uuid>,
    amount: Option<Decimal>,
    donation_type: Option<String>,
    payment_method: Option<String>,
    items: Option<Json<Vec<InKindItemRow>>>,
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct InKindItemRow {
    item: Option<String>,
    quantity: Option<Decimal>,
    unit: Option<String>,
}

impl TryFrom<DonationRow> for Donation {
    type Error = Error;

    fn try_from(row: DonationRow) -> Result<Self> {
        let amount = row.amount.unwrap_or(Decimal::ZERO);
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Error::ParsingError(format!(
                "Donation {} has a negative amount",
                row.id
            )));
        }

        let kind = match row.donation_type.as_deref() {
            Some("in-kind") => DonationKind::InKind {
                items: row
                    .items
                    .map(|json| json.0)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|entry| {
                        let item = entry.item.filter(|item| !item.trim().is_empty())?;
                        Some(InKindItem {
                            item,
                            quantity: entry.quantity.unwrap_or(Decimal::ZERO),
                            unit: entry.unit.unwrap_or_default(),
                        })
                    })
                    .collect(),
            },
            Some("monetary") | None => DonationKind::Monetary {
                payment_method: row
                    .payment_method
                    .as_deref()
                    .ok_or_else(|| {
                        Error::ParsingError(format!("Donation {} has no payment method", row.id))
                    })?
                    .parse()?,
            },
            Some(other) => {
                return Err(Error::ParsingError(format!(
                    "\"{}\" is not a valid donation type",
                    other
                )))
            }
        };

        Ok(Self {
            id: row.id,
            donor_id: row.donor_id,
            campaign_id: row.campaign_id,
            amount,
            kind,
            date: row.date,
        })
    }
}

/// Donation repository backed by the `donations` table
pub struct PgDonationRepo {
    pool: PgPool,
}

impl PgDonationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, filter: &str, id: Option<Uuid>) -> Result<Vec<Donation>> {
        let sql = format!("{} {} order by date desc", SELECT_DONATIONS, filter);
        let mut query = sqlx::query_as::<_, DonationRow>(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(collect_valid("donation", rows))
    }
}

#[async_trait]
impl DonationRepo for PgDonationRepo {
    #[tracing::instrument(name = "Fetch all donations", skip(self))]
    async fn list(&self) -> Result<Vec<Donation>> {
        self.fetch_where("", None).await
    }

    #[tracing::instrument(name = "Fetch donations for a campaign", skip(self))]
    async fn list_by_campaign(&self, campaign_id: Uuid) -> Result<Vec<Donation>> {
        self.fetch_where("where campaign_id=$1", Some(campaign_id))
            .await
    }

    #[tracing::instrument(name = "Fetch donations for a donor", skip(self))]
    async fn list_by_donor(&self, donor_id: Uuid) -> Result<Vec<Donation>> {
        self.fetch_where("where donor_id=$1", Some(donor_id)).await
    }

    #[tracing::instrument(name = "Insert donation", skip(self))]
    async fn insert(&self, new_donation: &NewDonation) -> Result<Uuid> {
        let (payment_method, items) = match &new_donation.kind {
            DonationKind::Monetary { payment_method } => (Some(payment_method.as_str()), None),
            DonationKind::InKind { items } => (None, Some(Json(items))),
        };

        let id = sqlx::query_scalar(
            "insert into donations(donor_id, campaign_id, amount, donation_type, \
             payment_method, items, date) values ($1, $2, $3, $4, $5, $6, $7) returning id",
        )
        .bind(new_donation.donor_id)
        .bind(new_donation.campaign_id)
        .bind(new_donation.amount)
        .bind(new_donation.kind.as_str())
        .bind(payment_method)
        .bind(items)
        .bind(new_donation.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
