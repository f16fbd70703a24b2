use std::collections::HashMap;

use rust_decimal::Decimal;

use serde::Serialize;

use uuid::Uuid;

use crate::domain::{Donation, Donor, DonorStatus};

use super::round_half_up;

/// Donors partitioned by how often they have given
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Retention {
    /// Registered, never donated
    pub new: usize,
    pub one_time: usize,
    /// More than one donation
    pub recurring: usize,
    /// Recurring share of all donors in percent, one decimal place
    pub retention_rate: Decimal,
}

impl Retention {
    pub fn compute(donors: &[Donor], donations: &[Donation]) -> Self {
        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for donation in donations {
            *counts.entry(donation.donor_id).or_default() += 1;
        }

        let (mut new, mut one_time, mut recurring) = (0, 0, 0);
        for donor in donors {
            match counts.get(&donor.id).copied().unwrap_or(0) {
                0 => new += 1,
                1 => one_time += 1,
                _ => recurring += 1,
            }
        }

        let retention_rate = if donors.is_empty() {
            Decimal::ZERO
        } else {
            round_half_up(
                Decimal::from(recurring) / Decimal::from(donors.len()) * Decimal::ONE_HUNDRED,
                1,
            )
        };

        Self {
            new,
            one_time,
            recurring,
            retention_rate,
        }
    }

    /// Chart slices, omitting empty groups
    pub fn slices(&self) -> Vec<(&'static str, usize)> {
        [
            ("Recurring (>1)", self.recurring),
            ("One-time", self.one_time),
            ("New (0)", self.new),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySplit {
    pub active: usize,
    pub inactive: usize,
}

impl ActivitySplit {
    pub fn compute(donors: &[Donor]) -> Self {
        let active = donors
            .iter()
            .filter(|d| d.status == DonorStatus::Active)
            .count();
        Self {
            active,
            inactive: donors.len() - active,
        }
    }
}
