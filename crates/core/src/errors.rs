//! Core error types for the Confection application.
//!
//! This module defines store-agnostic error types. Store-specific failures
//! (from the in-memory store, or any future document-database backend) are
//! converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// Store-specific errors are wrapped in string form to keep this type
/// backend-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Backend-agnostic error type for document store operations.
///
/// This enum uses `String` for most error details, allowing the storage
/// layer to convert backend-specific errors into this format.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),

    /// A read query failed to execute.
    #[error("Store query failed: {0}")]
    QueryFailed(String),

    /// A write (insert or delete) failed to commit.
    #[error("Store write failed: {0}")]
    WriteFailed(String),

    /// The requested document was not found.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The query needs server-side provisioning that is not ready, such as
    /// a composite index that is still building.
    #[error("Query precondition not met: {0}")]
    FailedPrecondition(String),

    /// A delete batch exceeded the per-commit limit.
    #[error("Delete batch of {requested} exceeds the limit of {limit}")]
    BatchTooLarge { limit: usize, requested: usize },

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this error is a transient provisioning condition that should
    /// be logged but never surfaced to the user (the query starts working
    /// once the backing index finishes building).
    pub fn is_transient_provisioning(&self) -> bool {
        matches!(self, StoreError::FailedPrecondition(_))
    }
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

/// Errors raised while exporting the transaction log.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No transactions in the selected range")]
    NothingToExport,

    #[error("Invalid export range: {0}")]
    InvalidRange(String),

    #[error("Failed to write CSV: {0}")]
    Csv(String),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(ExportError::Csv(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
