//! Patron identifiers
//!
//! A patron is known only by the 6-digit number on their library card.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Number of digits on a library card
pub const PATRON_ID_LEN: usize = 6;

/// Validated library card number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatronId(String);

impl PatronId {
    /// Parse a card number, rejecting anything that is not exactly six ASCII digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if is_valid_patron_id(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(DomainError::InvalidPatron)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a raw card number without allocating.
pub fn is_valid_patron_id(value: &str) -> bool {
    value.len() == PATRON_ID_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for PatronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PatronId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PatronId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PatronId> for String {
    fn from(id: PatronId) -> Self {
        id.0
    }
}

impl AsRef<str> for PatronId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
