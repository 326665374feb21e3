//! Live query module - the date-window subscription coordinator.
//!
//! One coordinator serves every consumer view: it owns the visible date
//! window, keeps exactly one live subscription scoped to it, and answers
//! aggregate questions over arbitrary ranges through a separate one-shot
//! path.

mod live_query_model;
mod live_query_service;


pub use live_query_model::{FinancialStats, ViewState};
pub use live_query_service::RangeQueryCoordinator;
