use async_trait::async_trait;

use chrono::{DateTime, Utc};

use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::{CommunicationRecord, NewCommunication};
use crate::error::{Error, Result};

use super::collect_valid;

/// Append-only log of messages sent to donors
#[async_trait]
pub trait CommunicationRepo: Send + Sync {
    async fn insert(&self, communication: &NewCommunication) -> Result<Uuid>;
    /// Newest first
    async fn list_by_donor(&self, donor_id: Uuid) -> Result<Vec<CommunicationRecord>>;
}

#[derive(Debug, sqlx::FromRow)]
struct CommunicationRow {
    id: Uuid,
    donor_id: Uuid,
    channel: String,
    subject: Option<String>,
    content: String,
    status: String,
    direction: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommunicationRow> for CommunicationRecord {
    type Error = Error;

    fn try_from(row: CommunicationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            donor_id: row.donor_id,
            channel: row.channel.parse()?,
            subject: row.subject,
            content: row.content,
            status: row.status.parse()?,
            direction: row.direction.parse()?,
            created_at: row.created_at,
        })
    }
}

pub struct PgCommunicationRepo {
    pool: PgPool,
}

impl PgCommunicationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunicationRepo for PgCommunicationRepo {
    #[tracing::instrument(name = "Log communication", skip(self))]
    async fn insert(&self, communication: &NewCommunication) -> Result<Uuid> {
        let id = sqlx::query_scalar(
            "insert into communications(donor_id, channel, subject, content, status, direction) \
             values ($1, $2, $3, $4, $5, 'Outbound') returning id",
        )
        .bind(communication.donor_id)
        .bind(communication.channel.as_str())
        .bind(communication.subject.as_deref())
        .bind(&communication.content)
        .bind(communication.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch communications for a donor", skip(self))]
    async fn list_by_donor(&self, donor_id: Uuid) -> Result<Vec<CommunicationRecord>> {
        let rows: Vec<CommunicationRow> = sqlx::query_as(
            "select id, donor_id, channel, subject, content, status, direction, created_at \
             from communications where donor_id=$1 order by created_at desc",
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_valid("communication", rows))
    }
}
