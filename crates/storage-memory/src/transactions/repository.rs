use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use confection_core::errors::StoreError;
use confection_core::transactions::{
    SnapshotEvent, SnapshotObserver, SubscriptionHandle, Transaction, TransactionDocument,
    TransactionFilter, TransactionStoreTrait, MAX_DELETE_BATCH_SIZE,
};
use confection_core::Result;

struct Subscriber {
    id: u64,
    filter: TransactionFilter,
    observer: SnapshotObserver,
}

#[derive(Default)]
struct Inner {
    documents: Vec<Transaction>,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

/// In-memory transaction store.
///
/// Holds the whole collection in one mutex and pushes a fresh snapshot to
/// every live subscription after each committed mutation, so consumers see
/// the same wholesale-replacement behavior a remote document store would
/// give them. Snapshots are ordered by `date` descending.
///
/// Delivery happens under the store lock; observers must not call back
/// into the store. The two `set_fail_*` levers inject backend failures so
/// integration tests can drive the error paths.
pub struct MemoryTransactionStore {
    inner: Arc<Mutex<Inner>>,
    fail_aggregates: AtomicBool,
    fail_writes: AtomicBool,
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            fail_aggregates: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every `aggregate_sum` call fail as if the backing index were
    /// missing, forcing callers onto their fetch-and-sum fallback.
    pub fn set_fail_aggregates(&self, fail: bool) {
        self.fail_aggregates.store(fail, Ordering::SeqCst);
    }

    /// Makes every write fail as if the backend were unreachable.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Internal(format!("store lock poisoned: {}", e)).into())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("injected write failure".to_string()).into());
        }
        Ok(())
    }
}

fn snapshot_for(documents: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    let mut matching: Vec<Transaction> = documents
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    matching
}

/// Pushes a fresh snapshot to every live subscription. Runs under the
/// store lock, which serializes deliveries with mutations and with
/// cancellation.
fn push_snapshots(inner: &Inner) {
    for subscriber in &inner.subscribers {
        let snapshot = snapshot_for(&inner.documents, &subscriber.filter);
        (subscriber.observer)(SnapshotEvent::Snapshot(snapshot));
    }
}

struct MemorySubscriptionHandle {
    inner: Arc<Mutex<Inner>>,
    id: u64,
}

impl SubscriptionHandle for MemorySubscriptionHandle {
    fn cancel(&self) {
        // Removal shares the delivery lock, so once this returns no
        // further observer call can start. A poisoned lock still lets
        // teardown proceed.
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.subscribers.retain(|s| s.id != self.id);
    }
}

impl Drop for MemorySubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[async_trait]
impl TransactionStoreTrait for MemoryTransactionStore {
    fn subscribe(
        &self,
        filter: TransactionFilter,
        observer: SnapshotObserver,
    ) -> Result<Box<dyn SubscriptionHandle>> {
        let mut inner = self.lock_inner()?;
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;

        let initial = snapshot_for(&inner.documents, &filter);
        debug!(
            "Subscription {} opened, {} documents match",
            id,
            initial.len()
        );
        inner.subscribers.push(Subscriber {
            id,
            filter,
            observer,
        });
        if let Some(subscriber) = inner.subscribers.last() {
            (subscriber.observer)(SnapshotEvent::Snapshot(initial));
        }

        Ok(Box::new(MemorySubscriptionHandle {
            inner: Arc::clone(&self.inner),
            id,
        }))
    }

    async fn insert(&self, document: TransactionDocument) -> Result<Transaction> {
        self.check_writable()?;
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            kind: document.kind,
            amount: document.amount,
            description: document.description,
            date: document.date,
            created_at: document.created_at,
        };

        let mut inner = self.lock_inner()?;
        inner.documents.push(transaction.clone());
        push_snapshots(&inner);
        Ok(transaction)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.check_writable()?;
        let mut inner = self.lock_inner()?;
        let before = inner.documents.len();
        inner.documents.retain(|t| t.id != id);
        if inner.documents.len() == before {
            return Err(StoreError::NotFound(id.to_string()).into());
        }
        push_snapshots(&inner);
        Ok(())
    }

    async fn fetch(&self, filter: TransactionFilter) -> Result<Vec<Transaction>> {
        let inner = self.lock_inner()?;
        Ok(snapshot_for(&inner.documents, &filter))
    }

    async fn fetch_ids(&self, filter: TransactionFilter) -> Result<Vec<String>> {
        let inner = self.lock_inner()?;
        Ok(snapshot_for(&inner.documents, &filter)
            .into_iter()
            .map(|t| t.id)
            .collect())
    }

    async fn aggregate_sum(&self, filter: TransactionFilter) -> Result<Decimal> {
        if self.fail_aggregates.load(Ordering::SeqCst) {
            return Err(StoreError::FailedPrecondition(
                "injected: aggregation index unavailable".to_string(),
            )
            .into());
        }
        let inner = self.lock_inner()?;
        Ok(inner
            .documents
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| t.amount)
            .sum())
    }

    async fn commit_delete_batch(&self, ids: &[String]) -> Result<()> {
        if ids.len() > MAX_DELETE_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge {
                limit: MAX_DELETE_BATCH_SIZE,
                requested: ids.len(),
            }
            .into());
        }
        self.check_writable()?;

        let id_set: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut inner = self.lock_inner()?;
        let before = inner.documents.len();
        inner.documents.retain(|t| !id_set.contains(t.id.as_str()));
        // Ids already gone are not an error; the batch commits what exists
        debug!(
            "Batch deleted {} of {} requested documents",
            before - inner.documents.len(),
            ids.len()
        );
        push_snapshots(&inner);
        Ok(())
    }
}
