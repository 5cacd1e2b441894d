// libs/scheduling-cell/src/services/slots.rs
//
// Time and slot primitives. Every interval comparison in the crate goes
// through `overlaps`; every comparison happens in integer minutes.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::FormatError;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Minutes since midnight.
pub fn to_minutes(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Inverse of `to_minutes`. `None` outside `[0, 1440)`.
pub fn from_minutes(minutes: i32) -> Option<NaiveTime> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    NaiveTime::from_hms_opt(minutes as u32 / 60, minutes as u32 % 60, 0)
}

/// Strict `HH:MM` parser: exactly five characters, zero-padded, 24h clock.
pub fn parse_time(s: &str) -> Result<NaiveTime, FormatError> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(FormatError::Time(s.to_string()));
    }

    let digit = |b: u8| (b as char).to_digit(10);
    match (digit(bytes[0]), digit(bytes[1]), digit(bytes[3]), digit(bytes[4])) {
        (Some(h1), Some(h2), Some(m1), Some(m2)) => {
            NaiveTime::from_hms_opt(h1 * 10 + h2, m1 * 10 + m2, 0)
                .ok_or_else(|| FormatError::Time(s.to_string()))
        }
        _ => Err(FormatError::Time(s.to_string())),
    }
}

/// `HH:MM` rendering; round-trips with `parse_time`.
pub fn format_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Strict `YYYY-MM-DD` parser.
pub fn parse_date(s: &str) -> Result<NaiveDate, FormatError> {
    if s.len() != 10 {
        return Err(FormatError::Date(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FormatError::Date(s.to_string()))
}

/// Half-open interval intersection: `[a_start, a_end)` meets `[b_start, b_end)`.
/// An interval starting exactly where another ends does not intersect it.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    to_minutes(a_start) < to_minutes(b_end) && to_minutes(b_start) < to_minutes(a_end)
}

/// Adds `delta` minutes, wrapping across hour boundaries. Appointments never
/// cross midnight, so leaving the day is an error rather than a wrap.
pub fn add_minutes(time: NaiveTime, delta: i32) -> Result<NaiveTime, FormatError> {
    from_minutes(to_minutes(time) + delta).ok_or(FormatError::OutOfDay)
}
