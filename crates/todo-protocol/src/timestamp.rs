// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversions between `google.protobuf.Timestamp` and `chrono`.
//!
//! Both representations carry nanosecond precision, so a valid timestamp
//! survives the round trip unchanged.

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use thiserror::Error;

/// Upper bound (exclusive) for the `nanos` field of a timestamp.
pub const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Errors that can occur converting a wire timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("nanos out of range: {0} (expected 0..{NANOS_PER_SECOND})")]
    NanosOutOfRange(i32),

    #[error("seconds out of range: {0}")]
    SecondsOutOfRange(i64),
}

/// Convert a wire timestamp to a UTC instant.
pub fn to_datetime(ts: &Timestamp) -> Result<DateTime<Utc>, TimestampError> {
    if !(0..NANOS_PER_SECOND).contains(&ts.nanos) {
        return Err(TimestampError::NanosOutOfRange(ts.nanos));
    }

    DateTime::from_timestamp(ts.seconds, ts.nanos as u32)
        .ok_or(TimestampError::SecondsOutOfRange(ts.seconds))
}

/// Convert a UTC instant to a wire timestamp.
pub fn from_datetime(dt: &DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}
