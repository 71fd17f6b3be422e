//! Server timestamps.
//!
//! The API is not consistent about how it renders `created_at`: rows read
//! straight from the database come back as `2025-03-01 09:15:00` (UTC, no
//! zone), while serialized datetimes use RFC 2822 (`Sat, 01 Mar 2025
//! 09:15:00 GMT`). Newer deployments emit RFC 3339. All three are accepted.

use core::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SQLITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error returned for timestamps in none of the accepted formats.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised timestamp: {0}")]
pub struct TimestampError(pub String);

/// A UTC instant reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap an existing UTC datetime.
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Parse any of the formats the API emits.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] if no format matches.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        let s = s.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(at.with_timezone(&Utc)));
        }
        if let Ok(at) = DateTime::parse_from_rfc2822(s) {
            return Ok(Self(at.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, SQLITE_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| TimestampError(s.to_owned()))
    }

    /// The instant as a chrono datetime.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
