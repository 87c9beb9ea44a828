//! Conversions between the three date representations.
//!
//! - user input/output: local server time (`MM/DD/YYYY` in, relative phrases out)
//! - internal: RFC 3339 strings in UTC, whose lexical order is chronological
//! - persisted: naive date-times with no offset, implicitly UTC
//!
//! Because input is read as local time, the stored UTC calendar day can be one
//! off from the day the user typed when the server is far from Greenwich.

use crate::error::{MemoError, Result};
use chrono::{
    DateTime, Datelike, Days, Duration, Local, LocalResult, NaiveDate, NaiveDateTime,
    SecondsFormat, TimeZone, Utc,
};

pub const INPUT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Years outside this range lose the fixed-width text layout that keeps
/// stored and internal dates sorting chronologically.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Parse a user-entered `MM/DD/YYYY` calendar date. The year is exactly four
/// unsigned digits.
pub fn parse_input_date(raw: &str) -> Result<NaiveDate> {
    let invalid = || MemoError::InvalidDate(raw.to_string());
    let trimmed = raw.trim();

    let year = trimmed.rsplit('/').next().ok_or_else(invalid)?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, INPUT_DATE_FORMAT).map_err(|_| invalid())
}

/// The instant a memo entered for `date` is filed under: local midnight of
/// the following day.
pub fn entry_instant(date: NaiveDate) -> Result<DateTime<Utc>> {
    entry_instant_in(date, &Local)
}

/// `entry_instant` with the server zone supplied by the caller.
pub fn entry_instant_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>> {
    let invalid = || MemoError::InvalidDate(date.format(INPUT_DATE_FORMAT).to_string());

    let shifted = date.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&shifted.year()) {
        return Err(invalid());
    }
    let midnight = shifted.and_time(chrono::NaiveTime::MIN);

    let local = match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight skipped by a DST jump; the first hour of the day exists.
        LocalResult::None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .ok_or_else(invalid)?,
    };

    let instant = local.with_timezone(&Utc);
    if !(MIN_YEAR..=MAX_YEAR).contains(&instant.year()) {
        return Err(invalid());
    }
    Ok(instant)
}

pub fn to_persisted(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc()
}

pub fn to_internal(persisted: NaiveDateTime) -> String {
    Utc.from_utc_datetime(&persisted)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Read an internal date string. Accepts full RFC 3339, or a bare date-time or
/// date without offset, which are taken as UTC.
pub fn parse_internal(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| Utc.from_utc_datetime(&d.and_time(chrono::NaiveTime::MIN)))
}

/// Relative label for an internal date string, measured against now.
pub fn humanize(date: &str) -> String {
    humanize_at(date, Local::now())
}

/// Never fails: anything unparsable comes back unchanged.
pub fn humanize_at(date: &str, now: DateTime<Local>) -> String {
    let Some(then) = parse_internal(date) else {
        return date.to_string();
    };
    let then = then.with_timezone(&Local);

    if then.date_naive() == now.date_naive() {
        return "Today".to_string();
    }

    let human = relative_phrase((then - now).num_seconds());
    if human == "in a day" {
        "Tomorrow".to_string()
    } else {
        human
    }
}

fn relative_phrase(delta: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const YEAR: i64 = 365 * DAY;

    let secs = delta.abs();
    let span = if secs < 10 {
        return "just now".to_string();
    } else if secs < 45 {
        "seconds".to_string()
    } else if secs < 90 {
        "a minute".to_string()
    } else if secs < 45 * MINUTE {
        format!("{} minutes", (secs / MINUTE).max(2))
    } else if secs < 90 * MINUTE {
        "an hour".to_string()
    } else if secs < 22 * HOUR {
        format!("{} hours", (secs / HOUR).max(2))
    } else if secs < 36 * HOUR {
        "a day".to_string()
    } else if secs < 30 * DAY {
        format!("{} days", (secs / DAY).max(2))
    } else if secs < 45 * DAY {
        "a month".to_string()
    } else if secs < 345 * DAY {
        format!("{} months", (secs / (30 * DAY)).max(2))
    } else if secs < YEAR + YEAR / 2 {
        "a year".to_string()
    } else {
        format!("{} years", (secs / YEAR).max(2))
    };

    if delta > 0 {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    }
}
