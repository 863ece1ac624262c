//! Validated search parameters accepted by a disposal-site lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::ValidationError;

/// Search radius in miles. The results page only offers these four options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchRadius {
    Five,
    Ten,
    #[default]
    Twenty,
    Fifty,
}

impl SearchRadius {
    pub const ALL: [SearchRadius; 4] = [Self::Five, Self::Ten, Self::Twenty, Self::Fifty];

    /// The form value for this radius (`"5"`, `"10"`, `"20"`, `"50"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Five => "5",
            Self::Ten => "10",
            Self::Twenty => "20",
            Self::Fifty => "50",
        }
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchRadius {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnsupportedRadius(s.to_string()))
    }
}

impl Serialize for SearchRadius {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A US ZIP code, either five digits or ZIP+4 (`73120-1234`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    /// Validate and wrap a caller-supplied ZIP code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingZipCode`] for blank input and
    /// [`ValidationError::InvalidZipCode`] for anything that is not a
    /// five-digit or ZIP+4 code.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingZipCode);
        }

        let (base, plus_four) = match trimmed.split_once('-') {
            Some((base, ext)) => (base, Some(ext)),
            None => (trimmed, None),
        };
        let all_digits =
            |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());

        if all_digits(base, 5) && plus_four.is_none_or(|ext| all_digits(ext, 4)) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidZipCode(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ZipCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
