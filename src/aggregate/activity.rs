use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc};

use rust_decimal::Decimal;

use serde::Serialize;

use uuid::Uuid;

use crate::domain::{Donation, Donor};

/// Dashboard feed length
pub const DEFAULT_FEED_LEN: usize = 5;
/// Longest feed served, as in the full activity log
pub const MAX_FEED_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Donation,
    Donor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub at: DateTime<Utc>,
}

/// Latest donations and registrations merged into one newest-first feed of at most
/// `limit` items, never more than [`MAX_FEED_LEN`]
pub fn recent_activity(
    donors: &[Donor],
    donations: &[Donation],
    limit: usize,
) -> Vec<ActivityItem> {
    let names: HashMap<Uuid, &str> = donors.iter().map(|d| (d.id, d.name.as_str())).collect();

    let donation_items = donations.iter().map(|d| ActivityItem {
        id: d.id,
        kind: ActivityKind::Donation,
        title: "New Donation received".into(),
        subtitle: format!(
            "From {}",
            names.get(&d.donor_id).copied().unwrap_or("Unknown")
        ),
        amount: Some(d.amount),
        at: d.date.and_time(NaiveTime::MIN).and_utc(),
    });
    let donor_items = donors.iter().map(|d| ActivityItem {
        id: d.id,
        kind: ActivityKind::Donor,
        title: "New Donor Registered".into(),
        subtitle: d.name.clone(),
        amount: None,
        at: d.created_at,
    });

    let mut feed: Vec<ActivityItem> = donation_items.chain(donor_items).collect();
    feed.sort_by(|a, b| b.at.cmp(&a.at));
    feed.truncate(limit.min(MAX_FEED_LEN));
    feed
}
