use std::sync::Arc;

use sqlx::PgPool;

use crate::error::Error;

mod campaigns;
mod communications;
mod donations;
mod donors;
mod org_settings;
mod users;

pub use campaigns::*;
pub use communications::*;
pub use donations::*;
pub use donors::*;
pub use org_settings::*;
pub use users::*;

/// One handle per entity repository, shared by every request
#[derive(Clone)]
pub struct Repositories {
    pub donors: Arc<dyn DonorRepo>,
    pub donations: Arc<dyn DonationRepo>,
    pub campaigns: Arc<dyn CampaignRepo>,
    pub communications: Arc<dyn CommunicationRepo>,
    pub settings: Arc<dyn SettingsRepo>,
    pub users: Arc<dyn UserRepo>,
}

impl Repositories {
    /// Repositories backed by a PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            donors: Arc::new(PgDonorRepo::new(pool.clone())),
            donations: Arc::new(PgDonationRepo::new(pool.clone())),
            campaigns: Arc::new(PgCampaignRepo::new(pool.clone())),
            communications: Arc::new(PgCommunicationRepo::new(pool.clone())),
            settings: Arc::new(PgSettingsRepo::new(pool.clone())),
            users: Arc::new(PgUserRepo::new(pool)),
        }
    }
}

/// Convert fetched rows into domain records, skipping rows that fail validation
fn collect_valid<R, T>(entity: &'static str, rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = Error>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(error.cause_chain = ?error, "Skipping a malformed {} row", entity);
                None
            }
        })
        .collect()
}

/// Fail with `NotFound` when a write touched no rows
fn expect_affected(
    result: sqlx::postgres::PgQueryResult,
    entity: &'static str,
    id: uuid::Uuid,
) -> crate::error::Result<()> {
    if result.rows_affected() == 0 {
        Err(Error::NotFound { entity, id })
    } else {
        Ok(())
    }
}
