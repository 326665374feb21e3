use chrono::{DateTime, Utc};
use log::debug;
use std::sync::Arc;

use crate::notifications::{NoOpNotificationSink, Notification, NotificationSink};
use crate::transactions::transactions_constants::{
    MAX_DELETE_BATCH_SIZE, MSG_ADD_FAILED, MSG_BULK_DELETE_FAILED, MSG_DELETE_FAILED,
    MSG_TRANSACTION_DELETED,
};
use crate::transactions::transactions_model::{
    DateRange, NewTransaction, Transaction, TransactionDocument, TransactionFilter,
};
use crate::transactions::{TransactionServiceTrait, TransactionStoreTrait};
use crate::Result;
use async_trait::async_trait;

/// Write path over the transaction collection.
///
/// Reads flow through the live subscription owned by the coordinator; this
/// service only mutates. Failures are surfaced through the notification
/// sink and returned; nothing is retried and nothing is applied
/// optimistically, since the visible list is store-driven.
pub struct TransactionService {
    store: Arc<dyn TransactionStoreTrait>,
    notification_sink: Arc<dyn NotificationSink>,
}

impl TransactionService {
    /// Creates a new TransactionService with an injected store handle.
    pub fn new(store: Arc<dyn TransactionStoreTrait>) -> Self {
        Self {
            store,
            notification_sink: Arc::new(NoOpNotificationSink),
        }
    }

    /// Sets the notification sink for this service.
    pub fn with_notification_sink(mut self, notification_sink: Arc<dyn NotificationSink>) -> Self {
        self.notification_sink = notification_sink;
        self
    }

    /// Deletes everything matching `filter` in sequential committed batches
    /// of at most [`MAX_DELETE_BATCH_SIZE`] ids.
    ///
    /// Not atomic across batches: a failure partway leaves earlier batches
    /// deleted. The partial count is logged and the error returned.
    async fn delete_matching(&self, filter: TransactionFilter) -> Result<u64> {
        let ids = match self.store.fetch_ids(filter).await {
            Ok(ids) => ids,
            Err(e) => {
                self.notification_sink
                    .notify(Notification::error(MSG_BULK_DELETE_FAILED));
                return Err(e);
            }
        };

        let total = ids.len();
        let mut deleted: u64 = 0;
        for chunk in ids.chunks(MAX_DELETE_BATCH_SIZE) {
            if let Err(e) = self.store.commit_delete_batch(chunk).await {
                log::warn!(
                    "Bulk delete aborted after {} of {} documents; earlier batches stay deleted",
                    deleted,
                    total
                );
                self.notification_sink
                    .notify(Notification::error(MSG_BULK_DELETE_FAILED));
                return Err(e);
            }
            deleted += chunk.len() as u64;
        }

        debug!("Deleted {} transactions in batches of {}", deleted, MAX_DELETE_BATCH_SIZE);
        Ok(deleted)
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    /// Resolves defaults and inserts the transaction. Success is silent;
    /// the live snapshot shows the new row.
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let document = new_transaction.into_document(Utc::now())?;
        match self.store.insert(document).await {
            Ok(transaction) => {
                debug!("Added transaction {}", transaction.id);
                Ok(transaction)
            }
            Err(e) => {
                self.notification_sink
                    .notify(Notification::error(MSG_ADD_FAILED));
                Err(e)
            }
        }
    }

    /// Deletes one transaction and raises an undo-capable notification
    /// carrying the record's full field set minus its id.
    async fn delete_transaction(&self, transaction: &Transaction) -> Result<()> {
        match self.store.delete_by_id(&transaction.id).await {
            Ok(()) => {
                debug!("Deleted transaction {}", transaction.id);
                self.notification_sink.notify(Notification::info_with_undo(
                    MSG_TRANSACTION_DELETED,
                    transaction.to_document(),
                ));
                Ok(())
            }
            Err(e) => {
                self.notification_sink
                    .notify(Notification::error(MSG_DELETE_FAILED));
                Err(e)
            }
        }
    }

    /// Re-inserts a deleted record's document verbatim. The store assigns a
    /// fresh id; every other field, `created_at` included, is preserved.
    async fn undo_delete(&self, document: TransactionDocument) -> Result<Transaction> {
        match self.store.insert(document).await {
            Ok(transaction) => {
                debug!("Recreated transaction as {}", transaction.id);
                Ok(transaction)
            }
            Err(e) => {
                self.notification_sink
                    .notify(Notification::error(MSG_ADD_FAILED));
                Err(e)
            }
        }
    }

    /// Deletes every transaction with `date` inside `[start, end]`. Bounds
    /// are used verbatim; callers pass full-day boundaries.
    async fn delete_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        self.delete_matching(TransactionFilter::for_range(DateRange::new(start, end)))
            .await
    }

    /// Deletes the entire collection.
    async fn clear_all(&self) -> Result<u64> {
        self.delete_matching(TransactionFilter::all()).await
    }
}
