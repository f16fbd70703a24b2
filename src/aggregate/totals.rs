use std::collections::HashMap;

use chrono::NaiveDate;

use rust_decimal::Decimal;

use serde::Serialize;

use uuid::Uuid;

use crate::domain::{Donation, Donor};

use super::{format_currency, round_half_up};

/// Exact sum of donation amounts
pub fn sum_amounts<'a>(donations: impl IntoIterator<Item = &'a Donation>) -> Decimal {
    donations.into_iter().map(|d| d.amount).sum()
}

/// Headline figures over a set of donations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationSummary {
    pub total: Decimal,
    pub count: usize,
    /// Rounded to a whole unit
    pub average: Decimal,
    pub max: Decimal,
    /// `total` as displayed currency
    pub total_label: String,
}

impl DonationSummary {
    pub fn from_donations(donations: &[Donation]) -> Self {
        let total = sum_amounts(donations);
        let count = donations.len();
        let average = if count > 0 {
            round_half_up(total / Decimal::from(count), 0)
        } else {
            Decimal::ZERO
        };
        let max = donations
            .iter()
            .map(|d| d.amount)
            .max()
            .unwrap_or(Decimal::ZERO);

        Self {
            total_label: format_currency(total),
            total,
            count,
            average,
            max,
        }
    }
}

/// A labelled slice of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub value: Decimal,
}

/// Monetary vs in-kind split, only listing kinds that occur
pub fn composition(donations: &[Donation]) -> Vec<Share> {
    let (mut monetary, mut in_kind) = (None, None);
    for donation in donations {
        let slot = if donation.kind.is_monetary() {
            &mut monetary
        } else {
            &mut in_kind
        };
        *slot.get_or_insert(Decimal::ZERO) += donation.amount;
    }

    [("Monetary", monetary), ("In-Kind", in_kind)]
        .into_iter()
        .filter_map(|(name, value)| {
            value.map(|value| Share {
                name: name.into(),
                value,
            })
        })
        .collect()
}

/// Donation totals per donor type, in order of first appearance.
///
/// Donations whose donor is not in `donors` fall under "Unknown".
pub fn totals_by_donor_type(donations: &[Donation], donors: &[Donor]) -> Vec<Share> {
    let types: HashMap<Uuid, &str> = donors
        .iter()
        .map(|d| (d.id, d.donor_type.as_str()))
        .collect();

    let mut shares: Vec<Share> = Vec::new();
    for donation in donations {
        let name = types.get(&donation.donor_id).copied().unwrap_or("Unknown");
        match shares.iter_mut().find(|s| s.name == name) {
            Some(share) => share.value += donation.amount,
            None => shares.push(Share {
                name: name.into(),
                value: donation.amount,
            }),
        }
    }
    shares
}

/// Giving history of a single donor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorProfile {
    pub total_donated: Decimal,
    pub donation_count: usize,
    pub last_donation_date: Option<NaiveDate>,
}

impl DonorProfile {
    pub fn new(donor_id: Uuid, donations: &[Donation]) -> Self {
        let own: Vec<&Donation> = donations.iter().filter(|d| d.donor_id == donor_id).collect();

        Self {
            total_donated: sum_amounts(own.iter().copied()),
            donation_count: own.len(),
            last_donation_date: own.iter().map(|d| d.date).max(),
        }
    }
}
