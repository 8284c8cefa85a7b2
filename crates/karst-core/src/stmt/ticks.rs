//! Tick-count encoding for durations and instants.
//!
//! A tick is 100 nanoseconds. Instants count ticks from the Unix epoch.
//! The integer encoding is chosen for speed over a textual date format.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

pub const TICKS_PER_SECOND: i64 = 10_000_000;

pub fn duration_to_ticks(duration: &Duration) -> i64 {
    match duration.num_nanoseconds() {
        Some(nanos) => nanos / 100,
        // Past the nanosecond range; microseconds still fit.
        None => duration
            .num_microseconds()
            .map(|micros| micros * 10)
            .unwrap_or(i64::MAX),
    }
}

pub fn duration_from_ticks(ticks: i64) -> Duration {
    Duration::microseconds(ticks / 10) + Duration::nanoseconds((ticks % 10) * 100)
}

pub fn datetime_to_ticks(datetime: &NaiveDateTime) -> i64 {
    let utc = datetime.and_utc();
    utc.timestamp_micros() * 10 + i64::from(utc.timestamp_subsec_nanos() % 1_000) / 100
}

pub fn datetime_from_ticks(ticks: i64) -> NaiveDateTime {
    datetime_utc_from_ticks(ticks).naive_utc()
}

pub fn datetime_utc_to_ticks(datetime: &DateTime<Utc>) -> i64 {
    datetime_to_ticks(&datetime.naive_utc())
}

pub fn datetime_utc_from_ticks(ticks: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(ticks / 10)
        .and_then(|dt| dt.checked_add_signed(Duration::nanoseconds((ticks % 10) * 100)))
        .unwrap_or_default()
}
