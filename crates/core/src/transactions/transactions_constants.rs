//! Constants for the transactions domain.

/// Description substituted for a sale created without one.
pub const DEFAULT_SALE_DESCRIPTION: &str = "Sale";

/// Description substituted for an expense created without one.
pub const DEFAULT_EXPENSE_DESCRIPTION: &str = "Expense";

/// Maximum deletions in a single committed store batch. Bulk deletes are
/// chunked to this size and committed sequentially.
pub const MAX_DELETE_BATCH_SIZE: usize = 500;

/// Notification shown when the live subscription fails.
pub const MSG_SYNC_FAILED: &str = "Failed to sync data.";

/// Notification shown when an insert fails.
pub const MSG_ADD_FAILED: &str = "Failed to add transaction. Check connection.";

/// Notification shown after a successful single delete; carries the undo
/// payload.
pub const MSG_TRANSACTION_DELETED: &str = "Transaction deleted.";

/// Notification shown when a single delete fails.
pub const MSG_DELETE_FAILED: &str = "Failed to delete transaction.";

/// Notification shown when a bulk delete fails.
pub const MSG_BULK_DELETE_FAILED: &str = "Error deleting data.";
