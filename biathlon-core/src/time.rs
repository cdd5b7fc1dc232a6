//! Race-clock codec
//!
//! Timestamps are written as `HH:MM:SS.mmm` and the configured start interval
//! as `HH:MM:SS`. Durations render back as `HH:MM:SS.mmm` without a sign.

use crate::types::{Duration, TimeError, Timestamp};

/// Parse a `HH:MM:SS.mmm` race-clock value
pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimeError> {
    let invalid = || TimeError::InvalidTimeFormat(s.to_string());

    let (clock, millis) = s.split_once('.').ok_or_else(invalid)?;
    let [hours, minutes, seconds] = parse_clock_fields(clock).ok_or_else(invalid)?;
    let millis = parse_field(millis, 3).ok_or_else(invalid)?;

    Timestamp::from_hms_milli_opt(hours, minutes, seconds, millis).ok_or_else(invalid)
}

/// Parse a `HH:MM:SS` interval into an absolute duration
pub fn parse_duration(s: &str) -> Result<Duration, TimeError> {
    let [hours, minutes, seconds] =
        parse_clock_fields(s).ok_or_else(|| TimeError::InvalidTimeFormat(s.to_string()))?;

    Ok(Duration::seconds(
        i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds),
    ))
}

/// Format a race-clock value as `HH:MM:SS.mmm`
pub fn format_timestamp(t: Timestamp) -> String {
    t.format("%H:%M:%S%.3f").to_string()
}

/// Format a duration as `HH:MM:SS.mmm`
///
/// The sign is dropped and sub-millisecond precision is truncated.
pub fn format_duration(d: Duration) -> String {
    let d = if d < Duration::zero() { -d } else { d };
    let total_ms = d.num_milliseconds();

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Seconds in a duration as a float, for speed calculations
pub fn duration_secs(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

/// Split `HH:MM:SS` into range-checked fields
fn parse_clock_fields(clock: &str) -> Option<[u32; 3]> {
    let mut fields = clock.split(':');

    let hours = parse_field(fields.next()?, 2)?;
    let minutes = parse_field(fields.next()?, 2)?;
    let seconds = parse_field(fields.next()?, 2)?;

    if fields.next().is_some() || hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    Some([hours, minutes, seconds])
}

/// Parse a fixed-width run of ASCII digits
fn parse_field(field: &str, width: usize) -> Option<u32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
