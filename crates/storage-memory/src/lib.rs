//! In-memory storage implementation for Confection.
//!
//! This crate implements the store traits defined in `confection-core`
//! against a plain in-process collection. It backs tests, demos, and
//! offline runs; a remote document-database backend would implement the
//! same traits and slot in unchanged.
//!
//! ```text
//!          core (domain)
//!                │
//!                ▼
//!      storage-memory (this crate)
//!                │
//!                ▼
//!       in-process collection
//! ```

pub mod transactions;

pub use transactions::MemoryTransactionStore;

// Re-export from confection-core for convenience
pub use confection_core::errors::{Error, Result, StoreError};
