//! Pure derivations over the loaded transaction list.
//!
//! Everything here operates on the coordinator's current snapshot without
//! touching the store. The snapshot arrives newest-first by `date`; helpers
//! that emit chronological output reverse it internally.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use rust_decimal::Decimal;

use super::analytics_model::{
    ChartPoint, HourlySales, PeriodGranularity, PeriodSummary, RankedItem, UNKNOWN_DESCRIPTION,
};
use crate::live_query::FinancialStats;
use crate::transactions::{DateRange, Transaction, TransactionKind};
use crate::utils::time_utils::{
    end_of_day, end_of_month, end_of_week, hour_label, same_day, start_of_day, start_of_month,
    start_of_week,
};

/// Transactions dated on the same UTC day as `day`.
pub fn filter_by_day(transactions: &[Transaction], day: DateTime<Utc>) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| same_day(t.date, day))
        .cloned()
        .collect()
}

/// Transactions inside the Monday-based week containing `instant`.
pub fn filter_by_week(transactions: &[Transaction], instant: DateTime<Utc>) -> Vec<Transaction> {
    filter_by_interval(
        transactions,
        &DateRange::new(start_of_week(instant), end_of_week(instant)),
    )
}

/// Transactions inside the calendar month containing `instant`.
pub fn filter_by_month(transactions: &[Transaction], instant: DateTime<Utc>) -> Vec<Transaction> {
    filter_by_interval(
        transactions,
        &DateRange::new(start_of_month(instant), end_of_month(instant)),
    )
}

/// Transactions inside the closed interval.
pub fn filter_by_interval(transactions: &[Transaction], range: &DateRange) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| range.contains(t.date))
        .cloned()
        .collect()
}

/// Per-kind totals of the given list, summed client-side.
pub fn totals(transactions: &[Transaction]) -> FinancialStats {
    let mut sales = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TransactionKind::Sale => sales += t.amount,
            TransactionKind::Expense => expense += t.amount,
        }
    }
    FinancialStats::from_totals(sales, expense)
}

/// Chart series grouped by `dd/MM` date key.
///
/// Keys appear in first-occurrence order of the chronological walk, so the
/// series reads oldest to newest left to right.
pub fn daily_series(transactions: &[Transaction]) -> Vec<ChartPoint> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut points: Vec<ChartPoint> = Vec::new();

    for t in transactions.iter().rev() {
        let key = t.date.format("%d/%m").to_string();
        let at = match index.get(&key) {
            Some(&at) => at,
            None => {
                index.insert(key.clone(), points.len());
                points.push(ChartPoint {
                    name: key,
                    sales: Decimal::ZERO,
                    expense: Decimal::ZERO,
                });
                points.len() - 1
            }
        };
        match t.kind {
            TransactionKind::Sale => points[at].sales += t.amount,
            TransactionKind::Expense => points[at].expense += t.amount,
        }
    }
    points
}

/// Top `limit` description groups of the given kind, by summed amount
/// descending.
///
/// Descriptions are trimmed before grouping; empty and whitespace-only
/// descriptions collapse into a single "Unknown" bucket. Equal sums order
/// by name so the ranking is deterministic.
pub fn top_items(
    transactions: &[Transaction],
    kind: TransactionKind,
    limit: usize,
) -> Vec<RankedItem> {
    let mut sums: HashMap<String, Decimal> = HashMap::new();
    for t in transactions.iter().filter(|t| t.kind == kind) {
        let name = t.description.trim();
        let name = if name.is_empty() {
            UNKNOWN_DESCRIPTION
        } else {
            name
        };
        *sums.entry(name.to_string()).or_insert(Decimal::ZERO) += t.amount;
    }

    let mut items: Vec<RankedItem> = sums
        .into_iter()
        .map(|(name, value)| RankedItem { name, value })
        .collect();
    items.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    items.truncate(limit);
    items
}

/// Day/week/month bucket totals of the given list, newest period first.
///
/// Week buckets use Monday-based ISO weeks keyed by the date's calendar
/// year, matching how the reporting screens have always grouped them.
pub fn period_summaries(
    transactions: &[Transaction],
    granularity: PeriodGranularity,
) -> Vec<PeriodSummary> {
    let mut buckets: HashMap<String, PeriodSummary> = HashMap::new();

    for t in transactions {
        let (key, label, start, end) = match granularity {
            PeriodGranularity::Day => (
                t.date.format("%Y-%m-%d").to_string(),
                t.date.format("%B %-d, %Y").to_string(),
                start_of_day(t.date),
                end_of_day(t.date),
            ),
            PeriodGranularity::Week => {
                let start = start_of_week(t.date);
                let end = end_of_week(t.date);
                let week = t.date.iso_week().week();
                (
                    format!("{}-W{}", t.date.year(), week),
                    format!(
                        "Week {} ({} - {})",
                        week,
                        start.format("%b %-d"),
                        end.format("%b %-d")
                    ),
                    start,
                    end,
                )
            }
            PeriodGranularity::Month => (
                t.date.format("%Y-%m").to_string(),
                t.date.format("%B %Y").to_string(),
                start_of_month(t.date),
                end_of_month(t.date),
            ),
        };

        buckets
            .entry(key.clone())
            .and_modify(|summary| summary.count += 1)
            .or_insert(PeriodSummary {
                key,
                label,
                count: 1,
                start,
                end,
            });
    }

    let mut summaries: Vec<PeriodSummary> = buckets.into_values().collect();
    summaries.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| b.key.cmp(&a.key)));
    summaries
}

/// Sale totals per hour of day, ascending by hour, keeping only hours that
/// saw at least one sale.
pub fn hourly_sales(transactions: &[Transaction]) -> Vec<HourlySales> {
    let mut hours: Vec<HourlySales> = (0..24)
        .map(|hour| HourlySales {
            hour,
            label: hour_label(hour),
            sales: Decimal::ZERO,
        })
        .collect();

    for t in transactions.iter().filter(|t| t.kind == TransactionKind::Sale) {
        hours[t.date.hour() as usize].sales += t.amount;
    }

    hours.retain(|h| h.sales > Decimal::ZERO);
    hours
}
