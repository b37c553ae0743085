//! UTC offsets for the VTIMEZONE block and UNTIL stamps.
//!
//! Only the offset in force at a single instant is looked up. No daylight
//! saving transitions are emitted, so recurring events in DST zones will
//! drift by an hour across a transition in clients that trust our VTIMEZONE.

use chrono::{NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

/// Resolve an IANA zone name, `None` for anything chrono-tz doesn't know.
pub fn lookup(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Seconds east of UTC for `name` at the local time `at`.
///
/// Unknown zones get a zero offset. Local times that fall in a DST gap use
/// the offset in force at the same wall-clock instant read as UTC.
pub fn utc_offset_seconds(name: &str, at: NaiveDateTime) -> i32 {
    let Some(tz) = lookup(name) else {
        return 0;
    };

    match tz.offset_from_local_datetime(&at).earliest() {
        Some(offset) => offset.fix().local_minus_utc(),
        None => tz.offset_from_utc_datetime(&at).fix().local_minus_utc(),
    }
}

/// Format an offset as `+HHMM`, or `+HHMMSS` when seconds are non-zero.
pub fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (hours, minutes, secs) = (abs / 3600, (abs % 3600) / 60, abs % 60);

    if secs == 0 {
        format!("{sign}{hours:02}{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}{secs:02}")
    }
}

/// Convert a local date-time in zone `name` to UTC.
///
/// Unknown zones, and local times that don't exist in the zone, are taken
/// to already be UTC.
pub fn local_to_utc(name: &str, local: NaiveDateTime) -> NaiveDateTime {
    lookup(name)
        .and_then(|tz| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.naive_utc())
        .unwrap_or(local)
}
