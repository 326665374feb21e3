//! CSV document rendering for transaction exports.

use chrono::{DateTime, Utc};

use crate::errors::{Error, ExportError};
use crate::transactions::Transaction;
use crate::Result;

/// Column order of the exported document.
pub const CSV_HEADER: [&str; 4] = ["Date", "Description", "Type", "Amount"];

const ROW_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Renders transactions as a CSV document, one row per transaction in the
/// order given. An empty slice is an error; the caller decides the range,
/// the writer refuses to produce a header-only file.
pub fn write_csv(transactions: &[Transaction]) -> Result<String> {
    if transactions.is_empty() {
        return Err(ExportError::NothingToExport.into());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for transaction in transactions {
        writer.write_record([
            transaction.date.format(ROW_DATE_FORMAT).to_string(),
            transaction.description.clone(),
            transaction.kind.as_str().to_string(),
            transaction.amount.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::from(ExportError::Csv(e.to_string())))
}

/// File name for an export produced at `now`, e.g.
/// `export_thisMonth_2024-03-05.csv`.
pub fn export_file_name(label: &str, now: DateTime<Utc>) -> String {
    format!("export_{}_{}.csv", label, now.format("%Y-%m-%d"))
}
