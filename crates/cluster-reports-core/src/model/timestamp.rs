// crates/cluster-reports-core/src/model/timestamp.rs
// ============================================================================
// Module: Cluster Report Timestamps
// Description: UTC timestamp wrapper with RFC 3339 wire encoding.
// Purpose: Give reports a single, ordered, serializable creation time type.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! [`Timestamp`] is always UTC and keeps nanosecond precision. It serializes
//! as an RFC 3339 string on the wire and converts to and from unix
//! nanoseconds for durable storage. Reading the wall clock is the job of a
//! [`crate::interfaces::Clock`]; this type never does it implicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;
use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Timestamp conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Value is outside the representable range.
    #[error("timestamp out of range: {0}")]
    OutOfRange(String),
    /// RFC 3339 text could not be parsed.
    #[error("invalid rfc3339 timestamp: {0}")]
    Parse(String),
    /// Timestamp could not be rendered as RFC 3339.
    #[error("timestamp format error: {0}")]
    Format(String),
}

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// UTC instant with nanosecond precision.
///
/// # Invariants
/// - The offset is always UTC; parsed values are normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Unix epoch.
    pub const UNIX_EPOCH: Self = Self(OffsetDateTime::UNIX_EPOCH);

    /// Wraps a date-time, normalizing it to UTC.
    #[must_use]
    pub fn from_datetime(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }

    /// Reads the current wall-clock time.
    #[must_use]
    pub fn now_utc() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Builds a timestamp from unix nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::OutOfRange`] when the value cannot be represented.
    pub fn from_unix_nanos(nanos: i128) -> Result<Self, TimestampError> {
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map(Self)
            .map_err(|err| TimestampError::OutOfRange(err.to_string()))
    }

    /// Returns the instant as unix nanoseconds.
    #[must_use]
    pub fn unix_nanos(&self) -> i128 {
        self.0.unix_timestamp_nanos()
    }

    /// Returns the instant as unix milliseconds, truncating sub-millisecond precision.
    #[must_use]
    pub fn unix_millis(&self) -> i128 {
        self.unix_nanos().div_euclid(1_000_000)
    }

    /// Parses an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Parse`] when the text is not valid RFC 3339.
    pub fn parse_rfc3339(value: &str) -> Result<Self, TimestampError> {
        OffsetDateTime::parse(value, &Rfc3339)
            .map(Self::from_datetime)
            .map_err(|err| TimestampError::Parse(err.to_string()))
    }

    /// Renders the timestamp as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Format`] for years outside 0..=9999.
    pub fn to_rfc3339(&self) -> Result<String, TimestampError> {
        self.0.format(&Rfc3339).map_err(|err| TimestampError::Format(err.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}ns", self.unix_nanos()),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = self.to_rfc3339().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
