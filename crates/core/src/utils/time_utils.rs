//! Day, week, and month boundary helpers.
//!
//! All instants in the domain are UTC; boundaries are computed on the UTC
//! calendar day. Range filtering depends on these helpers so that a window
//! always covers full days (00:00:00.000 through 23:59:59.999).

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// Truncates an instant to 00:00:00.000 of its UTC day.
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    at_midnight(instant.date_naive())
}

/// Extends an instant to 23:59:59.999 of its UTC day.
pub fn end_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    let date = instant.date_naive();
    Utc.from_utc_datetime(&date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default())
}

/// Start of the Monday-based week containing the instant.
pub fn start_of_week(instant: DateTime<Utc>) -> DateTime<Utc> {
    let date = instant.date_naive();
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    at_midnight(monday)
}

/// End of the Monday-based week containing the instant (Sunday 23:59:59.999).
pub fn end_of_week(instant: DateTime<Utc>) -> DateTime<Utc> {
    end_of_day(start_of_week(instant) + Duration::days(6))
}

/// First instant of the calendar month containing the instant.
pub fn start_of_month(instant: DateTime<Utc>) -> DateTime<Utc> {
    let date = instant.date_naive();
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    at_midnight(first)
}

/// Last instant of the calendar month containing the instant.
pub fn end_of_month(instant: DateTime<Utc>) -> DateTime<Utc> {
    let date = instant.date_naive();
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let last = first_of_next.and_then(|d| d.pred_opt()).unwrap_or(date);
    end_of_day(at_midnight(last))
}

/// First instant of the calendar year containing the instant.
pub fn start_of_year(instant: DateTime<Utc>) -> DateTime<Utc> {
    let date = instant.date_naive();
    let first = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
    at_midnight(first)
}

/// Whether two instants fall on the same UTC calendar day.
pub fn same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Clock label for an hour of day: `12AM`, `1AM`, ... `12PM`, ... `11PM`.
pub fn hour_label(hour: u32) -> String {
    let twelve_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hour < 12 { "AM" } else { "PM" };
    format!("{}{}", twelve_hour, suffix)
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}
