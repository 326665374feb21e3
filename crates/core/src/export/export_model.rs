//! Export domain models.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ExportError;
use crate::transactions::DateRange;
use crate::utils::time_utils::{
    end_of_day, end_of_month, start_of_day, start_of_month, start_of_year,
};
use crate::Result;

/// Preset export windows offered by the export screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuickRange {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "thisMonth")]
    ThisMonth,
    #[serde(rename = "last3Months")]
    LastThreeMonths,
    #[serde(rename = "thisYear")]
    ThisYear,
    #[serde(rename = "all")]
    AllTime,
}

impl QuickRange {
    /// Resolves the preset against `now`.
    ///
    /// `AllTime` starts at the epoch origin, the sentinel the aggregate
    /// path recognizes as "omit the date predicate".
    pub fn resolve(&self, now: DateTime<Utc>) -> DateRange {
        match self {
            QuickRange::Today => DateRange::new(start_of_day(now), end_of_day(now)),
            QuickRange::Yesterday => {
                let yesterday = now - Duration::days(1);
                DateRange::new(start_of_day(yesterday), end_of_day(yesterday))
            }
            QuickRange::ThisMonth => DateRange::new(start_of_month(now), end_of_month(now)),
            QuickRange::LastThreeMonths => {
                DateRange::new(months_back(now, 3), end_of_month(now))
            }
            QuickRange::ThisYear => DateRange::new(start_of_year(now), end_of_day(now)),
            QuickRange::AllTime => DateRange::new(DateTime::UNIX_EPOCH, end_of_day(now)),
        }
    }

    /// Key used in file names and on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            QuickRange::Today => "today",
            QuickRange::Yesterday => "yesterday",
            QuickRange::ThisMonth => "thisMonth",
            QuickRange::LastThreeMonths => "last3Months",
            QuickRange::ThisYear => "thisYear",
            QuickRange::AllTime => "all",
        }
    }

    /// Whether a document export over this preset is allowed. All-time
    /// exports are refused; the range is unbounded and the document count
    /// with it.
    pub fn exportable(&self) -> bool {
        !matches!(self, QuickRange::AllTime)
    }
}

/// Validates and normalizes a user-picked export interval to full-day
/// boundaries.
pub fn custom_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<DateRange> {
    if start > end {
        return Err(ExportError::InvalidRange(format!(
            "start {} is after end {}",
            start, end
        ))
        .into());
    }
    Ok(DateRange::days(start, end))
}

/// First instant of the month `months` before the one containing `instant`.
fn months_back(instant: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    let date = instant.date_naive();
    let total = date.year() * 12 + date.month0() as i32 - months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date);
    Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0).unwrap_or_default())
}
