//! Transaction domain models.

use crate::transactions::transactions_constants::{
    DEFAULT_EXPENSE_DESCRIPTION, DEFAULT_SALE_DESCRIPTION,
};
use crate::errors::ValidationError;
use crate::utils::time_utils::{end_of_day, start_of_day};
use crate::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parses a stored amount value into a Decimal, with support for scientific
/// notation. Anything unparseable counts as zero rather than failing the
/// containing document; range queries must keep working over records written
/// by older clients.
pub fn parse_amount_tolerant(value_str: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(value_str) {
            Ok(d) => d,
            Err(e_scientific) => {
                log::error!(
                    "Failed to parse amount '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    value_str, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}

/// The two kinds of transaction the bakery records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Sale,
    Expense,
}

impl TransactionKind {
    /// Wire form of the kind, as stored in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Expense => "expense",
        }
    }

    /// Label substituted when a record is created without a description.
    pub fn default_description(&self) -> &'static str {
        match self {
            TransactionKind::Sale => DEFAULT_SALE_DESCRIPTION,
            TransactionKind::Expense => DEFAULT_EXPENSE_DESCRIPTION,
        }
    }
}

/// A stored transaction row.
///
/// Immutable once created; the only mutation in the domain is deletion.
/// `date` is the sole field used for range filtering and ordering;
/// `created_at` is audit-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque identifier assigned by the store on creation.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    #[serde(with = "amount_format")]
    pub amount: Decimal,
    pub description: String,
    #[serde(with = "timestamp_format")]
    pub date: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The record's full field set minus `id`, as carried by an undo
    /// notification. Re-inserting it recreates the transaction under a
    /// fresh id.
    pub fn to_document(&self) -> TransactionDocument {
        TransactionDocument {
            kind: self.kind,
            amount: self.amount,
            description: self.description.clone(),
            date: self.date,
            created_at: self.created_at,
        }
    }
}

/// A fully resolved document ready for insertion: everything a stored row
/// has except the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDocument {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    #[serde(with = "amount_format")]
    pub amount: Decimal,
    pub description: String,
    #[serde(with = "timestamp_format")]
    pub date: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
}

/// User input for a new transaction, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    #[serde(with = "amount_format")]
    pub amount: Decimal,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.amount.is_sign_negative() {
            return Err(ValidationError::InvalidInput(format!(
                "amount cannot be negative: {}",
                self.amount
            ))
            .into());
        }
        Ok(())
    }

    /// Resolves defaults into an insertable document: an empty or missing
    /// description becomes "Sale"/"Expense" by kind, a missing date becomes
    /// `now`, and `created_at` is stamped `now`.
    pub fn into_document(self, now: DateTime<Utc>) -> Result<TransactionDocument> {
        self.validate()?;
        let description = match self.description {
            Some(d) if !d.is_empty() => d,
            _ => self.kind.default_description().to_string(),
        };
        Ok(TransactionDocument {
            kind: self.kind,
            amount: self.amount,
            description,
            date: self.date.unwrap_or(now),
            created_at: now,
        })
    }
}

/// A closed date interval used to scope queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// A range with the given bounds, used verbatim.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A range normalized to full-day boundaries: `start` truncated to
    /// 00:00:00.000 and `end` extended to 23:59:59.999. Callers scoping a
    /// view window must use this form to avoid truncating partial days.
    pub fn days(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start_of_day(start),
            end: end_of_day(end),
        }
    }

    /// Inclusive containment check.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Predicate set for store queries. `None` fields place no constraint;
/// the all-time aggregate path omits `date_range` entirely so the store
/// never needs the composite (type, date) index for it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub date_range: Option<DateRange>,
}

impl TransactionFilter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_kind(kind: TransactionKind) -> Self {
        Self {
            kind: Some(kind),
            date_range: None,
        }
    }

    pub fn for_range(date_range: DateRange) -> Self {
        Self {
            kind: None,
            date_range: Some(date_range),
        }
    }

    pub fn for_kind_in_range(kind: TransactionKind, date_range: DateRange) -> Self {
        Self {
            kind: Some(kind),
            date_range: Some(date_range),
        }
    }

    /// Evaluates the predicate against a document.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if transaction.kind != kind {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(transaction.date) {
                return false;
            }
        }
        true
    }
}

mod timestamp_format {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Always serialize in ISO 8601 format with UTC timezone
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        // First try parsing as RFC3339/ISO8601
        if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
            return Ok(dt.with_timezone(&Utc));
        }

        // Then try as date-only format
        if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            // Use midnight UTC for date-only values
            return Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()));
        }

        Err(serde::de::Error::custom(format!(
            "Invalid timestamp format: {}. Expected ISO 8601/RFC3339 or YYYY-MM-DD",
            s
        )))
    }
}

// Lenient (de)serialization for amounts: stored documents may hold numbers,
// strings, or garbage written by older clients, and a bad amount must read
// as zero instead of poisoning the whole snapshot.
mod amount_format {
    use num_traits::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{self, Deserialize, Deserializer, Serializer};
    use serde_json::Number;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AmountInput {
        String(String),
        Number(Number),
        Null,
    }

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Documents store amounts as plain numbers
        serializer.serialize_f64(value.to_f64().unwrap_or_default())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<AmountInput>::deserialize(deserializer)?;
        match raw {
            None | Some(AmountInput::Null) => Ok(Decimal::ZERO),
            Some(AmountInput::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(Decimal::ZERO);
                }
                Ok(super::parse_amount_tolerant(trimmed))
            }
            Some(AmountInput::Number(n)) => Ok(super::parse_amount_tolerant(&n.to_string())),
        }
    }
}
