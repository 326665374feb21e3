//! Analytics module - pure derivations over the loaded snapshot.

mod analytics_model;
mod derivations;


pub use analytics_model::{
    ChartPoint, HourlySales, PeriodGranularity, PeriodSummary, RankedItem, TOP_ITEMS_LIMIT,
    UNKNOWN_DESCRIPTION,
};
pub use derivations::{
    daily_series, filter_by_day, filter_by_interval, filter_by_month, filter_by_week,
    hourly_sales, period_summaries, top_items, totals,
};
