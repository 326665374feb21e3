//! Transactions module - domain models, store contract, and write path.

mod transactions_constants;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


#[cfg(test)]
mod transactions_model_tests;

pub use transactions_constants::*;
pub use transactions_model::{
    parse_amount_tolerant, DateRange, NewTransaction, Transaction, TransactionDocument,
    TransactionFilter, TransactionKind,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{
    SnapshotEvent, SnapshotObserver, SubscriptionHandle, TransactionServiceTrait,
    TransactionStoreTrait,
};
