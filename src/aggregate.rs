//! Derived reporting values.
//!
//! Everything here is a pure function over records already fetched from the
//! repositories. Amounts are summed exactly as [`Decimal`]; rounding only happens
//! where a value is meant for presentation.

use rust_decimal::{Decimal, RoundingStrategy};

mod activity;
mod calendar;
mod campaign;
mod dashboard;
mod monthly;
mod retention;
mod totals;
mod trend;

pub use activity::*;
pub use calendar::*;
pub use campaign::*;
pub use dashboard::*;
pub use monthly::*;
pub use retention::*;
pub use totals::*;
pub use trend::*;

/// Round to `dp` decimal places, halves away from zero
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as rupees with thousands separators, e.g. `₹12,345.50`
pub fn format_currency(amount: Decimal) -> String {
    let amount = round_half_up(amount, 2);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let text = amount.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) if fraction.trim_end_matches('0').is_empty() => {
            format!("{}₹{}", sign, grouped)
        }
        Some(fraction) => format!("{}₹{}.{:0<2}", sign, grouped, fraction),
        None => format!("{}₹{}", sign, grouped),
    }
}
