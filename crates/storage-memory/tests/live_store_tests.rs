//! End-to-end tests over the in-memory store: the live query coordinator
//! and the write-path service wired to a real `MemoryTransactionStore`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

use confection_core::notifications::MockNotificationSink;
use confection_core::transactions::{
    NewTransaction, TransactionKind, TransactionService, TransactionServiceTrait,
    MSG_TRANSACTION_DELETED,
};
use confection_core::{RangeQueryCoordinator, ViewState};
use confection_storage_memory::MemoryTransactionStore;

fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn new_transaction(kind: TransactionKind, amount: rust_decimal::Decimal, date: &str) -> NewTransaction {
    NewTransaction {
        kind,
        amount,
        description: Some("Croissant".to_string()),
        date: Some(instant(date)),
    }
}

#[tokio::test]
async fn test_live_view_follows_the_write_path() {
    let store = Arc::new(MemoryTransactionStore::new());
    let coordinator = RangeQueryCoordinator::new(store.clone());
    let service = TransactionService::new(store);

    coordinator
        .set_view_date_range(
            instant("2024-03-05T00:00:00Z"),
            instant("2024-03-05T00:00:00Z"),
        )
        .unwrap();
    assert_eq!(coordinator.view_state().unwrap(), ViewState::Ready);
    assert!(coordinator.transactions().unwrap().is_empty());

    let visible = service
        .add_transaction(new_transaction(
            TransactionKind::Sale,
            dec!(120),
            "2024-03-05T09:30:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(coordinator.transactions().unwrap().len(), 1);

    // A write outside the window never shows up
    service
        .add_transaction(new_transaction(
            TransactionKind::Sale,
            dec!(80),
            "2024-03-20T09:30:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(coordinator.transactions().unwrap().len(), 1);

    service.delete_transaction(&visible).await.unwrap();
    assert!(coordinator.transactions().unwrap().is_empty());
}

#[tokio::test]
async fn test_undo_recreates_the_transaction_under_a_new_id() {
    let store = Arc::new(MemoryTransactionStore::new());
    let coordinator = RangeQueryCoordinator::new(store.clone());
    let sink = MockNotificationSink::new();
    let service =
        TransactionService::new(store).with_notification_sink(Arc::new(sink.clone()));

    coordinator
        .set_view_date_range(
            instant("2024-03-05T00:00:00Z"),
            instant("2024-03-05T00:00:00Z"),
        )
        .unwrap();

    let original = service
        .add_transaction(new_transaction(
            TransactionKind::Sale,
            dec!(120),
            "2024-03-05T09:30:00Z",
        ))
        .await
        .unwrap();
    service.delete_transaction(&original).await.unwrap();
    assert!(coordinator.transactions().unwrap().is_empty());

    let deleted = sink
        .notifications()
        .into_iter()
        .find(|n| n.message == MSG_TRANSACTION_DELETED)
        .unwrap();
    let recreated = service.undo_delete(deleted.undo.unwrap()).await.unwrap();

    // Same content in the same window, new identity
    let visible = coordinator.transactions().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, recreated.id);
    assert_ne!(recreated.id, original.id);
    assert_eq!(recreated.amount, original.amount);
    assert_eq!(recreated.date, original.date);
    assert_eq!(recreated.created_at, original.created_at);
}

#[tokio::test]
async fn test_range_switch_shows_only_the_new_window() {
    let store = Arc::new(MemoryTransactionStore::new());
    let coordinator = RangeQueryCoordinator::new(store.clone());
    let service = TransactionService::new(store);

    let march_fifth = service
        .add_transaction(new_transaction(
            TransactionKind::Sale,
            dec!(10),
            "2024-03-05T09:30:00Z",
        ))
        .await
        .unwrap();
    let march_sixth = service
        .add_transaction(new_transaction(
            TransactionKind::Expense,
            dec!(20),
            "2024-03-06T09:30:00Z",
        ))
        .await
        .unwrap();

    coordinator
        .set_view_date_range(
            instant("2024-03-05T00:00:00Z"),
            instant("2024-03-05T00:00:00Z"),
        )
        .unwrap();
    let visible = coordinator.transactions().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, march_fifth.id);

    coordinator
        .set_view_date_range(
            instant("2024-03-06T00:00:00Z"),
            instant("2024-03-06T00:00:00Z"),
        )
        .unwrap();
    let visible = coordinator.transactions().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, march_sixth.id);

    coordinator
        .set_view_date_range(
            instant("2024-03-05T00:00:00Z"),
            instant("2024-03-06T00:00:00Z"),
        )
        .unwrap();
    let visible = coordinator.transactions().unwrap();
    assert_eq!(visible.len(), 2);
    // Newest first
    assert_eq!(visible[0].id, march_sixth.id);
}

#[tokio::test]
async fn test_bulk_delete_by_day_clears_the_window() {
    let store = Arc::new(MemoryTransactionStore::new());
    let coordinator = RangeQueryCoordinator::new(store.clone());
    let service = TransactionService::new(store);

    for date in [
        "2024-03-04T09:00:00Z",
        "2024-03-05T09:00:00Z",
        "2024-03-05T15:00:00Z",
        "2024-03-06T09:00:00Z",
    ] {
        service
            .add_transaction(new_transaction(TransactionKind::Sale, dec!(10), date))
            .await
            .unwrap();
    }

    coordinator
        .set_view_date_range(
            instant("2024-03-01T00:00:00Z"),
            instant("2024-03-31T00:00:00Z"),
        )
        .unwrap();
    assert_eq!(coordinator.transactions().unwrap().len(), 4);

    let deleted = service
        .delete_by_date_range(
            instant("2024-03-05T00:00:00Z"),
            instant("2024-03-05T23:59:59.999Z"),
        )
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = coordinator.transactions().unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|t| !t.date.to_rfc3339().starts_with("2024-03-05")));
}

#[tokio::test]
async fn test_financial_stats_agree_with_and_without_aggregates() {
    let store = Arc::new(MemoryTransactionStore::new());
    let coordinator = RangeQueryCoordinator::new(store.clone());
    let service = TransactionService::new(store.clone());

    service
        .add_transaction(new_transaction(
            TransactionKind::Sale,
            dec!(100),
            "2024-03-05T09:30:00Z",
        ))
        .await
        .unwrap();
    service
        .add_transaction(new_transaction(
            TransactionKind::Sale,
            dec!(20),
            "2024-03-06T09:30:00Z",
        ))
        .await
        .unwrap();
    service
        .add_transaction(new_transaction(
            TransactionKind::Expense,
            dec!(30),
            "2024-03-05T16:00:00Z",
        ))
        .await
        .unwrap();
    // Outside the month
    service
        .add_transaction(new_transaction(
            TransactionKind::Sale,
            dec!(999),
            "2023-11-20T09:30:00Z",
        ))
        .await
        .unwrap();

    let range_start = instant("2024-03-01T00:00:00Z");
    let range_end = instant("2024-03-31T23:59:59.999Z");

    let stats = coordinator
        .financial_stats(range_start, range_end)
        .await
        .unwrap();
    assert_eq!(stats.total_sales, dec!(120));
    assert_eq!(stats.total_expense, dec!(30));
    assert_eq!(stats.net_profit, dec!(90));

    // The fetch-and-sum fallback lands on the same numbers
    store.set_fail_aggregates(true);
    let fallback = coordinator
        .financial_stats(range_start, range_end)
        .await
        .unwrap();
    assert_eq!(fallback, stats);

    // Epoch start drops the date predicate entirely
    let all_time = coordinator
        .financial_stats(DateTime::UNIX_EPOCH, range_end)
        .await
        .unwrap();
    assert_eq!(all_time.total_sales, dec!(1119));
}
