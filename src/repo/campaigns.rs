use async_trait::async_trait;

use chrono::{DateTime, NaiveDate, Utc};

use rust_decimal::Decimal;

use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::{Campaign, NewCampaign};
use crate::error::{Error, Result};

use super::collect_valid;

#[async_trait]
pub trait CampaignRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Campaign>>;
    async fn fetch(&self, id: Uuid) -> Result<Option<Campaign>>;
    async fn insert(&self, new_campaign: &NewCampaign) -> Result<Uuid>;
}

const SELECT_CAMPAIGNS: &str =
    "select id, title, description, goal_amount, deadline, status, created_at from campaigns";

#[derive(Debug, sqlx::FromRow)]
struct CampaignRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    goal_amount: Option<Decimal>,
    deadline: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = Error;

    fn try_from(row: CampaignRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            goal_amount: row.goal_amount.unwrap_or(Decimal::ZERO),
            deadline: row.deadline,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

/// Campaign repository backed by the `campaigns` table
pub struct PgCampaignRepo {
    pool: PgPool,
}

impl PgCampaignRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepo for PgCampaignRepo {
    #[tracing::instrument(name = "Fetch all campaigns", skip(self))]
    async fn list(&self) -> Result<Vec<Campaign>> {
        let rows: Vec<CampaignRow> =
            sqlx::query_as(&format!("{} order by created_at desc", SELECT_CAMPAIGNS))
                .fetch_all(&self.pool)
                .await?;

        Ok(collect_valid("campaign", rows))
    }

    #[tracing::instrument(name = "Fetch a campaign by id", skip(self))]
    async fn fetch(&self, id: Uuid) -> Result<Option<Campaign>> {
        let row: Option<CampaignRow> =
            sqlx::query_as(&format!("{} where id=$1", SELECT_CAMPAIGNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Campaign::try_from).transpose()
    }

    #[tracing::instrument(name = "Insert campaign", skip(self))]
    async fn insert(&self, new_campaign: &NewCampaign) -> Result<Uuid> {
        let id = sqlx::query_scalar(
            "insert into campaigns(title, description, goal_amount, deadline, status) \
             values ($1, $2, $3, $4, 'Active') returning id",
        )
        .bind(&new_campaign.title)
        .bind(&new_campaign.description)
        .bind(new_campaign.goal_amount)
        .bind(new_campaign.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
