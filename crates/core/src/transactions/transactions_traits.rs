//! Traits for the transaction store and write-path service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionDocument, TransactionFilter,
};
use crate::errors::StoreError;
use crate::Result;

/// Events pushed to a live snapshot observer.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// A complete replacement set of documents matching the subscribed
    /// filter, ordered by `date` descending. Never an incremental delta.
    Snapshot(Vec<Transaction>),
    /// The subscription failed. No further events follow on this
    /// subscription; re-subscribing is the only recovery.
    SubscriptionError(StoreError),
}

/// Callback receiving live snapshot events.
///
/// Invoked from the store's delivery context; implementations must be cheap
/// and non-blocking.
pub type SnapshotObserver = Arc<dyn Fn(SnapshotEvent) + Send + Sync>;

/// Handle to an active live subscription.
pub trait SubscriptionHandle: Send + Sync {
    /// Stops delivery. Synchronous and idempotent: no observer invocation
    /// starts after this returns.
    fn cancel(&self);
}

/// Backend abstraction over the flat transaction collection.
///
/// Implemented by `confection-storage-memory`; a remote document database
/// backend would implement the same contract. Injected as `Arc<dyn ...>` at
/// construction so tests can substitute a fake.
#[async_trait]
pub trait TransactionStoreTrait: Send + Sync {
    /// Registers a live query. The store delivers an initial snapshot and a
    /// fresh one after every matching change, each a wholesale replacement
    /// list ordered by `date` descending.
    fn subscribe(
        &self,
        filter: TransactionFilter,
        observer: SnapshotObserver,
    ) -> Result<Box<dyn SubscriptionHandle>>;

    /// Inserts a document and returns the stored row with its assigned id.
    async fn insert(&self, document: TransactionDocument) -> Result<Transaction>;

    /// Deletes a single document.
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    /// One-shot fetch of every document matching `filter`, ordered by
    /// `date` descending.
    async fn fetch(&self, filter: TransactionFilter) -> Result<Vec<Transaction>>;

    /// Ids of every document matching `filter`.
    async fn fetch_ids(&self, filter: TransactionFilter) -> Result<Vec<String>>;

    /// Server-side sum of `amount` over documents matching `filter`.
    ///
    /// A filter combining a kind with a date range needs the composite
    /// (type, date) index; stores signal a missing index with
    /// [`StoreError::FailedPrecondition`] and callers must fall back to
    /// [`fetch`](Self::fetch) plus client-side summation.
    async fn aggregate_sum(&self, filter: TransactionFilter) -> Result<Decimal>;

    /// Deletes the given ids in one committed batch, all-or-nothing.
    ///
    /// At most [`MAX_DELETE_BATCH_SIZE`] ids per call; larger batches are
    /// rejected with [`StoreError::BatchTooLarge`].
    ///
    /// [`MAX_DELETE_BATCH_SIZE`]: super::MAX_DELETE_BATCH_SIZE
    async fn commit_delete_batch(&self, ids: &[String]) -> Result<()>;
}

/// Write-path operations exposed to the app shell.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn delete_transaction(&self, transaction: &Transaction) -> Result<()>;

    async fn undo_delete(&self, document: TransactionDocument) -> Result<Transaction>;

    async fn delete_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>)
        -> Result<u64>;

    async fn clear_all(&self) -> Result<u64>;
}
