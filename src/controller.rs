use chrono::{NaiveDate, Utc};

use crate::domain::ValidationErrors;

pub mod campaigns;
pub mod communications;
pub mod donations;
pub mod donors;
pub mod org_settings;
pub mod reports;
pub mod send_email;

/// Server-local calendar date used for validation and month-over-month figures
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse an optional `YYYY-MM-DD` form field
fn parse_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match value.parse::<NaiveDate>() {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Invalid date");
            None
        }
    }
}

/// Empty strings count as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
