use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::ClockError;

/// Parses an "HH:mm" wall-clock string as stored on a shift.
pub fn parse_wall_clock(value: &str) -> Result<NaiveTime, ClockError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|source| ClockError::InvalidWallClock {
        value: value.to_string(),
        source,
    })
}

/// Rejects spans whose end time-of-day is before the start (overnight
/// shifts). Callers must supply day/time fields that already encode any
/// rollover; this arithmetic never invents one.
pub fn check_shift_span(start: NaiveTime, end: NaiveTime) -> Result<(), ClockError> {
    if end < start {
        return Err(ClockError::OvernightSpan { start, end });
    }
    Ok(())
}

/// Combines a shift's calendar day with its end time-of-day.
///
/// Day and time are stored UTC-normalized by the scheduling feature, so the
/// combined instant is UTC as well; the host zone is never consulted.
pub fn shift_end_instant(day: NaiveDate, end: NaiveTime) -> DateTime<Utc> {
    day.and_time(end).and_utc()
}

/// Scheduled shift end plus the configured grace period. A grace of zero
/// means the record is late the moment the shift ends.
pub fn cutoff_instant(shift_end: DateTime<Utc>, grace_minutes: i64) -> DateTime<Utc> {
    shift_end + Duration::minutes(grace_minutes)
}
