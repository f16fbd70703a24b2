use chrono::{DateTime, Utc};

use serde::Serialize;

use uuid::Uuid;

text_enum! {
    Channel {
        Email => "Email",
        WhatsApp => "WhatsApp",
    }
}

text_enum! {
    DeliveryStatus {
        Sent => "Sent",
        Failed => "Failed",
    }
}

text_enum! {
    Direction {
        Outbound => "Outbound",
    }
}

/// Append-only audit entry for a message sent to a donor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunicationRecord {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub channel: Channel,
    /// Email only
    pub subject: Option<String>,
    pub content: String,
    pub status: DeliveryStatus,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCommunication {
    pub donor_id: Uuid,
    pub channel: Channel,
    pub subject: Option<String>,
    pub content: String,
    pub status: DeliveryStatus,
}
