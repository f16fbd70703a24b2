use chrono::Datelike;

use rust_decimal::Decimal;

use serde::Serialize;

use crate::domain::Donation;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: &'static str,
    pub amount: Decimal,
}

/// Twelve buckets, January first, summing donations dated in each month of `year`.
/// Months without donations are zero, never omitted.
pub fn monthly_totals(year: i32, donations: &[Donation]) -> Vec<MonthlyTotal> {
    let mut buckets = [Decimal::ZERO; 12];
    for donation in donations.iter().filter(|d| d.date.year() == year) {
        buckets[donation.date.month0() as usize] += donation.amount;
    }

    MONTHS
        .iter()
        .zip(buckets)
        .map(|(&month, amount)| MonthlyTotal { month, amount })
        .collect()
}

/// Sum of donations dated in a single month
pub fn month_total(year: i32, month: u32, donations: &[Donation]) -> Decimal {
    donations
        .iter()
        .filter(|d| d.date.year() == year && d.date.month() == month)
        .map(|d| d.amount)
        .sum()
}
