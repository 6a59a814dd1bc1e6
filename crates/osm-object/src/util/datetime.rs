//! ISO-8601 UTC timestamp parsing and formatting.
//!
//! OSM timestamps have exactly one textual form, `YYYY-MM-DDThh:mm:ssZ`
//! (20 characters), and are stored as seconds since the Unix epoch in a
//! `u32`.

use crate::error::DateTimeParseError;

/// Length of the only accepted timestamp form.
pub const TIMESTAMP_LEN: usize = 20;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Returns true if the given year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given date.
fn date_to_days(year: i32, month: u32, day: u32) -> i64 {
    // Howard Hinnant's days_from_civil
    let y = if month <= 2 { year - 1 } else { year } as i64;
    let m = if month <= 2 {
        month as i64 + 9
    } else {
        month as i64 - 3
    };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // year of era
    let doy = (153 * m as u32 + 2) / 5 + day - 1; // day of year
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era

    era * 146097 + doe as i64 - 719468
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i32, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };

    let year = if m <= 2 { y + 1 } else { y } as i32;
    (year, m, d)
}

/// Parses the decimal digits in `bytes[start..end]`.
fn digits(bytes: &[u8], start: usize, end: usize) -> Option<u32> {
    bytes[start..end].iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}

/// Parses the leading `YYYY-MM-DDThh:mm:ssZ` of `text` into seconds since
/// the Unix epoch.
///
/// Only the first [`TIMESTAMP_LEN`] bytes are examined; whatever follows is
/// left for the caller to judge.
pub fn parse_iso_timestamp(text: &str) -> Result<u32, DateTimeParseError> {
    let bytes = text.as_bytes();
    if bytes.len() < TIMESTAMP_LEN {
        return Err(DateTimeParseError::new(format!(
            "timestamp too short: {:?}",
            text
        )));
    }

    let separators = [(4, b'-'), (7, b'-'), (10, b'T'), (13, b':'), (16, b':'), (19, b'Z')];
    if separators.iter().any(|&(i, c)| bytes[i] != c) {
        return Err(DateTimeParseError::new(format!(
            "timestamp not in YYYY-MM-DDThh:mm:ssZ form: {:?}",
            text
        )));
    }

    let field = |start, end, what: &str| {
        digits(bytes, start, end)
            .ok_or_else(|| DateTimeParseError::new(format!("invalid {} in timestamp: {:?}", what, text)))
    };
    let year = field(0, 4, "year")? as i32;
    let month = field(5, 7, "month")?;
    let day = field(8, 10, "day")?;
    let hours = field(11, 13, "hours")?;
    let minutes = field(14, 16, "minutes")?;
    let seconds = field(17, 19, "seconds")?;

    if !(1..=12).contains(&month) {
        return Err(DateTimeParseError::new(format!("invalid month in timestamp: {:?}", text)));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(DateTimeParseError::new(format!("invalid day in timestamp: {:?}", text)));
    }
    // 60 admits a leap second
    if hours > 23 || minutes > 59 || seconds > 60 {
        return Err(DateTimeParseError::new(format!("invalid time of day in timestamp: {:?}", text)));
    }

    let epoch_seconds = date_to_days(year, month, day) * SECONDS_PER_DAY
        + hours as i64 * SECONDS_PER_HOUR
        + minutes as i64 * SECONDS_PER_MINUTE
        + seconds as i64;

    u32::try_from(epoch_seconds).map_err(|_| {
        DateTimeParseError::new(format!("timestamp out of range 1970..2106: {:?}", text))
    })
}

/// Formats seconds since the Unix epoch as `YYYY-MM-DDThh:mm:ssZ`.
pub fn format_iso_timestamp(epoch_seconds: u32) -> String {
    let secs = epoch_seconds as i64;
    let (year, month, day) = days_to_date(secs / SECONDS_PER_DAY);
    let time = secs % SECONDS_PER_DAY;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        time / SECONDS_PER_HOUR,
        time % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        time % SECONDS_PER_MINUTE
    )
}
