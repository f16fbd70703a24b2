use chrono::{DateTime, Utc};

use serde::Serialize;

use url::Url;

use uuid::Uuid;

use super::EmailAddress;

/// Organisation profile and integration keys, stored as a single row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgSettings {
    pub id: Uuid,
    pub org_name: String,
    pub org_email: Option<String>,
    pub org_phone: Option<String>,
    pub org_address: Option<String>,
    pub website: Option<String>,
    pub upi_id: Option<String>,
    pub razorpay_key: Option<String>,
    pub notifications_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

/// Validated replacement for the settings row
#[derive(Debug, Clone)]
pub struct OrgSettingsUpdate {
    pub org_name: String,
    pub org_email: Option<EmailAddress>,
    pub org_phone: Option<String>,
    pub org_address: Option<String>,
    pub website: Option<Url>,
    pub upi_id: Option<String>,
    pub razorpay_key: Option<String>,
    pub notifications_enabled: bool,
}
