//! Timestamp input
//!
//! Callers may hand over timestamps with or without a UTC offset. Naive
//! values are interpreted as UTC everywhere they enter the system, so the
//! rest of the domain only ever sees `DateTime<Utc>`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Naive layouts accepted besides RFC 3339
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A point in time as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Timestamp {
    /// No offset given
    Naive(NaiveDateTime),
    /// Explicit offset given
    Zoned(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Convert to UTC, treating a naive value as already being UTC.
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Timestamp::Naive(naive) => naive.and_utc(),
            Timestamp::Zoned(zoned) => zoned.with_timezone(&Utc),
        }
    }

    /// Whether the caller omitted the offset
    pub fn is_naive(&self) -> bool {
        matches!(self, Timestamp::Naive(_))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp::Zoned(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Timestamp::Zoned(value)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Timestamp::Naive(value)
    }
}

impl FromStr for Timestamp {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(zoned) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp::Zoned(zoned));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Timestamp::Naive(naive));
            }
        }

        // Date only: start of day
        if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Timestamp::Naive(naive));
        }

        Err(DomainError::validation(format!("Invalid datetime: {}", s)))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Timestamp::from_str(&value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
            Timestamp::Zoned(zoned) => write!(f, "{}", zoned.to_rfc3339()),
        }
    }
}
