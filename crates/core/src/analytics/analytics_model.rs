//! Analytics domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many ranked items the reporting screens show.
pub const TOP_ITEMS_LIMIT: usize = 5;

/// Bucket name for transactions whose description is empty or whitespace.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// One point of the daily sales-versus-expense chart, keyed by a `dd/MM`
/// label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub name: String,
    pub sales: Decimal,
    pub expense: Decimal,
}

/// One row of a top-N ranking: a description group and its summed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub name: String,
    pub value: Decimal,
}

/// Granularity of period bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
    Day,
    Week,
    Month,
}

/// One day/week/month bucket of the loaded transaction list.
///
/// Carries the bucket's full boundaries so a consumer can act on the
/// period, such as deleting everything inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    /// Stable bucket key: `yyyy-MM-dd`, `{year}-W{week}`, or `yyyy-MM`.
    pub key: String,
    /// Human-readable label, such as `March 5, 2024` or `Week 10 (Mar 4 - Mar 10)`.
    pub label: String,
    /// Number of transactions in the bucket.
    pub count: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Sales volume for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySales {
    pub hour: u32,
    /// Clock label: `12AM`, `1AM`, ... `11PM`.
    pub label: String,
    pub sales: Decimal,
}
