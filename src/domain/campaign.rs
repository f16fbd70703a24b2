use chrono::{DateTime, NaiveDate, Utc};

use rust_decimal::Decimal;

use serde::Serialize;

use uuid::Uuid;

text_enum! {
    CampaignStatus {
        Active => "Active",
        Completed => "Completed",
    }
}

/// Stored campaign record.
///
/// Raised amount and donor count are not stored; see [`crate::aggregate::CampaignProgress`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub goal_amount: Decimal,
    pub deadline: NaiveDate,
    /// Status as stored; a campaign may still be completed by its donations
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated campaign to be created
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub goal_amount: Decimal,
    pub deadline: NaiveDate,
}
