use std::str::FromStr;

use regex::Regex;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

const MAX_LEN: usize = 256;

/// Display name of a donor, letters and spaces only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorName(String);

impl AsRef<str> for DonorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DonorName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref NAME_REGEX: Regex = Regex::new(r"^[A-Za-z\s]+$").unwrap();
        }

        let value = value.trim();

        if value.is_empty() {
            return Err(Error::ParsingError("Name is required".into()));
        }
        if value.graphemes(true).count() > MAX_LEN {
            return Err(Error::ParsingError("Name too long".into()));
        }
        if !NAME_REGEX.is_match(value) {
            return Err(Error::ParsingError("Name must contain only letters".into()));
        }
        Ok(Self(value.to_string()))
    }
}
