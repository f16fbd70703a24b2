use std::fmt;
use std::str::FromStr;

use regex::Regex;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

const MAX_LEN: usize = 256;

/// A donor or administrator email address
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EmailAddress(String);

impl FromStr for EmailAddress {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
        }

        let value = value.trim();

        if value.is_empty() {
            return Err(Error::ParsingError("Email is required".into()));
        }
        if value.graphemes(true).count() > MAX_LEN {
            return Err(Error::ParsingError("Email address too long".into()));
        }
        if !EMAIL_REGEX.is_match(value) {
            return Err(Error::ParsingError("Invalid email address".into()));
        }

        Ok(Self(value.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
