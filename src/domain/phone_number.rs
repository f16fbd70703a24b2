use std::str::FromStr;

use regex::Regex;

use crate::error::{Error, Result};

/// Donor phone number, 10 to 15 digits with no separators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref PHONE_REGEX: Regex = Regex::new(r"^\d{10,15}$").unwrap();
        }

        let value = value.trim();

        if value.is_empty() {
            return Err(Error::ParsingError("Phone is required".into()));
        }
        if !PHONE_REGEX.is_match(value) {
            return Err(Error::ParsingError("Phone must be 10-15 digits".into()));
        }
        Ok(Self(value.to_string()))
    }
}
