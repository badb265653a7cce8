//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision.
//!
//! ## Invariant
//!
//! Every ledger record in the stack carries a UTC timestamp with Z
//! suffix. Local timezone offsets would make equal instants render as
//! different strings in the event log, so non-UTC inputs are rejected at
//! construction — there is no silent conversion.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`Timestamp`].
#[derive(Error, Debug)]
pub enum TimestampError {
    /// The input string is not valid RFC 3339 or uses a non-Z offset.
    #[error("invalid timestamp {input:?}: {reason}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The Unix epoch value is out of range.
    #[error("invalid unix timestamp: {0}")]
    InvalidEpoch(i64),
}

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::from_epoch_secs()`] — from a Unix epoch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted;
    /// explicit offsets are rejected even when semantically equivalent
    /// (`+00:00`).
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::Invalid {
                input: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or(TimestampError::InvalidEpoch(secs))?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
