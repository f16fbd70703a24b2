use chrono::{DateTime, NaiveDate, Utc};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use super::{DonorName, EmailAddress, PhoneNumber};

text_enum! {
    /// Kind of donor, used to split donation sources in reports
    DonorType {
        Individual => "Individual",
        Corporate => "Corporate",
        Recurring => "Recurring",
    }
}

text_enum! {
    DonorStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
}

/// A named date remembered on behalf of a donor, e.g. a death anniversary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorialDate {
    pub tag: String,
    pub date: NaiveDate,
}

/// Stored donor record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Donor {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub donor_type: DonorType,
    pub status: DonorStatus,
    pub birth_date: Option<NaiveDate>,
    pub anniversary_date: Option<NaiveDate>,
    pub social_media_handle: Option<String>,
    /// Ordered as entered
    pub memorial_dates: Vec<MemorialDate>,
    pub created_at: DateTime<Utc>,
}

impl Donor {
    /// Case-insensitive substring match over name and email.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(needle))
    }
}

/// Validated donor registration or edit
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub name: DonorName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub donor_type: DonorType,
    pub status: DonorStatus,
    pub birth_date: NaiveDate,
    pub anniversary_date: Option<NaiveDate>,
    pub social_media_handle: Option<String>,
    pub memorial_dates: Vec<MemorialDate>,
}
