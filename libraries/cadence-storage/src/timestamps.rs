//! Timestamps are stored as unix milliseconds.

use cadence_core::{CadenceError, Result};
use chrono::{DateTime, Utc};

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CadenceError::storage(format!("Invalid timestamp: {millis}")))
}
