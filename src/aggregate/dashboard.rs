use chrono::{DateTime, Datelike, NaiveDate, Utc};

use rust_decimal::Decimal;

use serde::Serialize;

use crate::domain::{Campaign, Donation, Donor};

use super::{month_total, sum_amounts, PeriodChange};

/// One headline card on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: Decimal,
    /// Month-over-month movement of the underlying figure
    pub change: PeriodChange,
    pub change_label: String,
}

impl StatCard {
    fn new(title: &'static str, value: Decimal, change: PeriodChange) -> Self {
        let change_label = change.label();
        Self {
            title,
            value,
            change,
            change_label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_donations: StatCard,
    pub donors: StatCard,
    pub campaigns: StatCard,
}

impl DashboardStats {
    /// Headline totals, each compared month-over-month as of `today`
    pub fn compute(
        donors: &[Donor],
        donations: &[Donation],
        campaigns: &[Campaign],
        today: NaiveDate,
    ) -> Self {
        let (this_month, last_month) = month_and_previous(today);

        let donated = PeriodChange::new(
            month_total(last_month.0, last_month.1, donations),
            month_total(this_month.0, this_month.1, donations),
        );
        let registered = PeriodChange::new(
            created_in(donors.iter().map(|d| d.created_at), last_month),
            created_in(donors.iter().map(|d| d.created_at), this_month),
        );
        let launched = PeriodChange::new(
            created_in(campaigns.iter().map(|c| c.created_at), last_month),
            created_in(campaigns.iter().map(|c| c.created_at), this_month),
        );

        Self {
            total_donations: StatCard::new("Total Donations", sum_amounts(donations), donated),
            donors: StatCard::new("Active Donors", Decimal::from(donors.len()), registered),
            campaigns: StatCard::new("Campaign Reach", Decimal::from(campaigns.len()), launched),
        }
    }
}

/// (year, month) of `today` and of the month before it
fn month_and_previous(today: NaiveDate) -> ((i32, u32), (i32, u32)) {
    let current = (today.year(), today.month());
    let previous = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    (current, previous)
}

fn created_in(timestamps: impl Iterator<Item = DateTime<Utc>>, (year, month): (i32, u32)) -> Decimal {
    let count = timestamps
        .filter(|t| t.year() == year && t.month() == month)
        .count();
    Decimal::from(count)
}
