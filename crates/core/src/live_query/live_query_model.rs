//! Live query domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle of the coordinator's view window.
///
/// `Idle` until the first range is set; `Loading` while a subscription is
/// establishing or re-establishing; `Ready` once a snapshot has landed;
/// `Error` after a non-suppressed subscription failure (the last good
/// snapshot, if any, stays readable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Aggregate totals over a date range.
///
/// Produced by the aggregate-only query path; `None` at the call site means
/// "stats unavailable", which consumers must render as a placeholder and
/// never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStats {
    pub total_sales: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
}

impl FinancialStats {
    /// Builds stats from per-kind totals; missing aggregates enter as zero.
    pub fn from_totals(total_sales: Decimal, total_expense: Decimal) -> Self {
        Self {
            total_sales,
            total_expense,
            net_profit: total_sales - total_expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_net_profit_is_sales_minus_expense() {
        let stats = FinancialStats::from_totals(dec!(100), dec!(30));
        assert_eq!(stats.net_profit, dec!(70));

        let negative = FinancialStats::from_totals(dec!(10), dec!(45.50));
        assert_eq!(negative.net_profit, dec!(-35.50));
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = FinancialStats::from_totals(dec!(100), dec!(30));
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("totalSales").is_some());
        assert!(json.get("totalExpense").is_some());
        assert!(json.get("netProfit").is_some());
    }
}
