use rust_decimal::Decimal;

use serde::Serialize;

use super::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Percentage change from `previous` to `current`.
///
/// A rise from zero counts as 100% growth rather than an infinite one; no
/// movement from zero is 0%.
pub fn percentage_change(previous: Decimal, current: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        (current - previous) / previous * Decimal::ONE_HUNDRED
    } else if current > Decimal::ZERO {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Comparison of a figure against the preceding period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodChange {
    pub current: Decimal,
    pub previous: Decimal,
    /// Rounded to one decimal place
    pub change: Decimal,
    pub trend: Trend,
}

impl PeriodChange {
    pub fn new(previous: Decimal, current: Decimal) -> Self {
        let change = percentage_change(previous, current);
        let trend = if change >= Decimal::ZERO {
            Trend::Up
        } else {
            Trend::Down
        };

        Self {
            current,
            previous,
            change: round_half_up(change, 1),
            trend,
        }
    }

    /// Signed percentage label, e.g. `+12.5%` or `-50%`
    pub fn label(&self) -> String {
        let change = self.change.normalize();
        if change > Decimal::ZERO {
            format!("+{}%", change)
        } else {
            format!("{}%", change)
        }
    }
}
