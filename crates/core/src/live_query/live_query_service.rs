use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::live_query_model::{FinancialStats, ViewState};
use crate::errors::Error;
use crate::notifications::{NoOpNotificationSink, Notification, NotificationSink};
use crate::transactions::{
    DateRange, SnapshotEvent, SnapshotObserver, SubscriptionHandle, Transaction,
    TransactionFilter, TransactionKind, TransactionStoreTrait, MSG_SYNC_FAILED,
};
use crate::utils::time_utils::{end_of_month, start_of_month};
use crate::Result;

struct CoordinatorState {
    /// Bumped on every range change and on shutdown. Events delivered by a
    /// subscription tagged with an older generation are discarded, so the
    /// last range set always wins regardless of delivery timing.
    generation: u64,
    range: Option<DateRange>,
    subscription: Option<Box<dyn SubscriptionHandle>>,
    transactions: Vec<Transaction>,
    view_state: ViewState,
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self {
            generation: 0,
            range: None,
            subscription: None,
            transactions: Vec::new(),
            view_state: ViewState::Idle,
        }
    }
}

/// Owns the currently visible date window and the single live subscription
/// scoped to it.
///
/// Consumer views all call [`set_view_date_range`](Self::set_view_date_range)
/// on their own schedule; the normalized-range equality guard keeps that
/// from cycling subscriptions. The held transaction list is replaced
/// wholesale by each snapshot and read out by value.
pub struct RangeQueryCoordinator {
    store: Arc<dyn TransactionStoreTrait>,
    notification_sink: Arc<dyn NotificationSink>,
    state: Arc<Mutex<CoordinatorState>>,
}

impl RangeQueryCoordinator {
    /// Creates a coordinator with an injected store handle. No subscription
    /// exists until the first range is set.
    pub fn new(store: Arc<dyn TransactionStoreTrait>) -> Self {
        Self {
            store,
            notification_sink: Arc::new(NoOpNotificationSink),
            state: Arc::new(Mutex::new(CoordinatorState::default())),
        }
    }

    /// Sets the notification sink for this coordinator.
    pub fn with_notification_sink(mut self, notification_sink: Arc<dyn NotificationSink>) -> Self {
        self.notification_sink = notification_sink;
        self
    }

    /// Opens the initial view window: the current calendar month.
    pub fn start(&self) -> Result<()> {
        let now = Utc::now();
        self.set_view_date_range(start_of_month(now), end_of_month(now))
    }

    /// Points the live subscription at `[start, end]`, normalized to
    /// full-day boundaries.
    ///
    /// Setting a range equal (to the instant) to the active one is a
    /// complete no-op: no teardown, no loading flicker, no new
    /// subscription. Otherwise the previous subscription is cancelled
    /// before the new one is established, so at most one is ever live.
    pub fn set_view_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
        let range = DateRange::days(start, end);

        let (generation, stale_handle) = {
            let mut state = self.lock_state()?;
            if state.range.as_ref() == Some(&range) {
                log::debug!("View range unchanged; keeping the active subscription");
                return Ok(());
            }
            state.generation += 1;
            state.range = Some(range.clone());
            state.view_state = ViewState::Loading;
            (state.generation, state.subscription.take())
        };

        // Release the old listener before creating its replacement.
        if let Some(handle) = stale_handle {
            handle.cancel();
        }

        log::debug!(
            "Subscribing to transactions in [{}, {}]",
            range.start,
            range.end
        );
        let observer = self.observer_for(generation);
        let handle = match self
            .store
            .subscribe(TransactionFilter::for_range(range), observer)
        {
            Ok(handle) => handle,
            Err(e) => return self.handle_subscribe_failure(generation, e),
        };

        let raced = {
            let mut state = self.lock_state()?;
            if state.generation == generation {
                state.subscription = Some(handle);
                None
            } else {
                // A newer range landed while this subscription was being
                // established; it is already stale.
                Some(handle)
            }
        };
        // Cancel outside the lock; stores may deliver while tearing down.
        if let Some(handle) = raced {
            handle.cancel();
        }
        Ok(())
    }

    /// Current snapshot, newest-first by `date`.
    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.lock_state()?.transactions.clone())
    }

    /// The active normalized range, if any has been set.
    pub fn current_range(&self) -> Result<Option<DateRange>> {
        Ok(self.lock_state()?.range.clone())
    }

    pub fn view_state(&self) -> Result<ViewState> {
        Ok(self.lock_state()?.view_state)
    }

    /// Whether a subscription is still establishing for the current range.
    pub fn is_loading(&self) -> Result<bool> {
        Ok(self.view_state()? == ViewState::Loading)
    }

    /// Releases the live subscription and clears the held snapshot. Called
    /// on sign-out or when the owning shell unmounts.
    pub fn shutdown(&self) -> Result<()> {
        let handle = {
            let mut state = self.lock_state()?;
            state.generation += 1;
            state.range = None;
            state.transactions.clear();
            state.view_state = ViewState::Idle;
            state.subscription.take()
        };
        if let Some(handle) = handle {
            handle.cancel();
        }
        Ok(())
    }

    /// Aggregate totals over `[start, end]` without streaming documents.
    ///
    /// A `start` equal to the epoch origin is the all-time sentinel: the
    /// date predicate is omitted entirely and only the kind filters apply,
    /// which keeps the query off the composite (type, date) index. Per-kind
    /// sums run concurrently; if server-side aggregation fails, every
    /// matching document is fetched and summed client-side instead. `None`
    /// means both paths failed and stats are unavailable, which is not the
    /// same as zero.
    ///
    /// Independent of the live subscription. Concurrent calls are neither
    /// coalesced nor cancelled; callers that race range changes should
    /// compare the range a result was requested for before applying it.
    pub async fn financial_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<FinancialStats> {
        let date_range = if start == DateTime::UNIX_EPOCH {
            None
        } else {
            Some(DateRange::new(start, end))
        };
        let sale_filter = TransactionFilter {
            kind: Some(TransactionKind::Sale),
            date_range: date_range.clone(),
        };
        let expense_filter = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            date_range,
        };

        let (sales, expenses) = tokio::join!(
            self.store.aggregate_sum(sale_filter.clone()),
            self.store.aggregate_sum(expense_filter.clone())
        );
        match (sales, expenses) {
            (Ok(total_sales), Ok(total_expense)) => {
                Some(FinancialStats::from_totals(total_sales, total_expense))
            }
            _ => {
                log::warn!("Aggregate query failed; falling back to document fetch");
                self.stats_from_documents(sale_filter, expense_filter).await
            }
        }
    }

    /// Client-side fallback: fetch both document sets and sum amounts,
    /// with unparseable stored amounts already zeroed at deserialization.
    async fn stats_from_documents(
        &self,
        sale_filter: TransactionFilter,
        expense_filter: TransactionFilter,
    ) -> Option<FinancialStats> {
        let (sales, expenses) = tokio::join!(
            self.store.fetch(sale_filter),
            self.store.fetch(expense_filter)
        );
        match (sales, expenses) {
            (Ok(sales), Ok(expenses)) => Some(FinancialStats::from_totals(
                sum_amounts(&sales),
                sum_amounts(&expenses),
            )),
            (sales_result, expenses_result) => {
                log::error!(
                    "Financial stats unavailable; fallback fetch failed (sales: {}, expenses: {})",
                    result_error(&sales_result),
                    result_error(&expenses_result)
                );
                None
            }
        }
    }

    fn observer_for(&self, generation: u64) -> SnapshotObserver {
        let state = Arc::clone(&self.state);
        let notification_sink = Arc::clone(&self.notification_sink);
        Arc::new(move |event| {
            Self::apply_snapshot_event(&state, &notification_sink, generation, event)
        })
    }

    fn apply_snapshot_event(
        state: &Mutex<CoordinatorState>,
        notification_sink: &Arc<dyn NotificationSink>,
        generation: u64,
        event: SnapshotEvent,
    ) {
        let mut guard = match state.lock() {
            Ok(guard) => guard,
            Err(e) => {
                log::error!("Coordinator state lock poisoned; dropping snapshot event: {}", e);
                return;
            }
        };
        if guard.generation != generation {
            log::debug!("Discarding event from a cancelled subscription");
            return;
        }
        match event {
            SnapshotEvent::Snapshot(transactions) => {
                log::debug!("Snapshot received: {} transactions", transactions.len());
                guard.transactions = transactions;
                guard.view_state = ViewState::Ready;
            }
            SnapshotEvent::SubscriptionError(e) if e.is_transient_provisioning() => {
                // Index still building; a snapshot arrives once it is ready.
                log::warn!("Snapshot subscription waiting on provisioning: {}", e);
            }
            SnapshotEvent::SubscriptionError(e) => {
                log::error!("Snapshot subscription failed: {}", e);
                guard.view_state = ViewState::Error;
                drop(guard);
                notification_sink.notify(Notification::error(MSG_SYNC_FAILED));
            }
        }
    }

    /// Applies the subscription error taxonomy to a synchronous subscribe
    /// failure: provisioning errors are suppressed and the view keeps
    /// loading, anything else surfaces and flips the state to `Error`.
    fn handle_subscribe_failure(&self, generation: u64, e: Error) -> Result<()> {
        if is_suppressed(&e) {
            log::warn!("Snapshot subscription pending provisioning: {}", e);
            return Ok(());
        }
        {
            let mut state = self.lock_state()?;
            if state.generation == generation {
                state.view_state = ViewState::Error;
            }
        }
        self.notification_sink
            .notify(Notification::error(MSG_SYNC_FAILED));
        Err(e)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, CoordinatorState>> {
        self.state
            .lock()
            .map_err(|e| Error::Unexpected(format!("coordinator state lock poisoned: {}", e)))
    }
}

fn sum_amounts(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(|t| t.amount).sum()
}

fn is_suppressed(e: &Error) -> bool {
    matches!(e, Error::Store(store_error) if store_error.is_transient_provisioning())
}

fn result_error<T>(result: &Result<T>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(e) => e.to_string(),
    }
}
