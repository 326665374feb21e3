//! Confection Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Confection, a sales
//! and expense tracker. It is storage-agnostic and defines traits that
//! are implemented by backend crates such as `storage-memory`.

pub mod analytics;
pub mod errors;
pub mod export;
pub mod live_query;
pub mod notifications;
pub mod transactions;
pub mod utils;

// Re-export common types from the transaction and live query modules
pub use live_query::*;
pub use transactions::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
