#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValidationError};
    use crate::transactions::transactions_model::*;
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn document_json(amount: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "txn-1",
            "type": "sale",
            "amount": amount,
            "description": "Croissant",
            "date": "2024-03-05T09:30:00+00:00",
            "createdAt": "2024-03-05T09:30:00+00:00"
        })
    }

    #[test]
    fn test_parse_amount_tolerant_accepts_plain_and_scientific() {
        assert_eq!(parse_amount_tolerant("45.50"), dec!(45.50));
        assert_eq!(parse_amount_tolerant("-3"), dec!(-3));
        assert_eq!(parse_amount_tolerant("1.2e3"), dec!(1200));
        assert_eq!(parse_amount_tolerant("not a number"), Decimal::ZERO);
    }

    #[test]
    fn test_transaction_serializes_with_wire_keys() {
        let transaction = Transaction {
            id: "txn-1".to_string(),
            kind: TransactionKind::Expense,
            amount: dec!(45.5),
            description: "Flour".to_string(),
            date: instant("2024-03-05T09:30:00Z"),
            created_at: instant("2024-03-05T09:31:00Z"),
        };

        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], json!(45.5));
        assert_eq!(json["date"], "2024-03-05T09:30:00+00:00");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_transaction_deserializes_a_stored_document() {
        let transaction: Transaction =
            serde_json::from_value(document_json(json!(120))).unwrap();
        assert_eq!(transaction.id, "txn-1");
        assert_eq!(transaction.kind, TransactionKind::Sale);
        assert_eq!(transaction.amount, dec!(120));
        assert_eq!(transaction.description, "Croissant");
        assert_eq!(transaction.date, instant("2024-03-05T09:30:00Z"));
    }

    /// Stored documents written by older clients may hold amounts as
    /// strings, nulls, or garbage; every such value must read as a number
    /// instead of failing the snapshot.
    #[test]
    fn test_amounts_deserialize_leniently() {
        let cases = [
            (json!(120), dec!(120)),
            (json!(45.5), dec!(45.5)),
            (json!("45.50"), dec!(45.50)),
            (json!("1.2e3"), dec!(1200)),
            (json!(null), Decimal::ZERO),
            (json!(""), Decimal::ZERO),
            (json!("   "), Decimal::ZERO),
            (json!("corrupt"), Decimal::ZERO),
        ];
        for (raw, expected) in cases {
            let transaction: Transaction =
                serde_json::from_value(document_json(raw.clone())).unwrap();
            assert_eq!(
                transaction.amount, expected,
                "amount {:?} should read as {}",
                raw, expected
            );
        }

        // A document with no amount field at all also reads as zero.
        let mut missing = document_json(json!(0));
        missing.as_object_mut().unwrap().remove("amount");
        let transaction: Transaction = serde_json::from_value(missing).unwrap();
        assert_eq!(transaction.amount, Decimal::ZERO);
    }

    #[test]
    fn test_timestamps_accept_rfc3339_and_date_only() {
        let mut doc = document_json(json!(10));
        doc["date"] = json!("2024-03-05");
        let transaction: Transaction = serde_json::from_value(doc).unwrap();
        assert_eq!(transaction.date, instant("2024-03-05T00:00:00Z"));

        let mut doc = document_json(json!(10));
        doc["date"] = json!("05/03/2024");
        assert!(serde_json::from_value::<Transaction>(doc).is_err());
    }

    #[test]
    fn test_into_document_resolves_defaults() {
        let now = instant("2024-03-05T09:30:00Z");

        let sale = NewTransaction {
            kind: TransactionKind::Sale,
            amount: dec!(120),
            description: None,
            date: None,
        };
        let doc = sale.into_document(now).unwrap();
        assert_eq!(doc.description, "Sale");
        assert_eq!(doc.date, now);
        assert_eq!(doc.created_at, now);

        let expense = NewTransaction {
            kind: TransactionKind::Expense,
            amount: dec!(45.50),
            description: Some(String::new()),
            date: None,
        };
        let doc = expense.into_document(now).unwrap();
        assert_eq!(doc.description, "Expense");
    }

    #[test]
    fn test_into_document_keeps_explicit_fields() {
        let now = instant("2024-03-05T09:30:00Z");
        let date = instant("2024-03-01T16:00:00Z");
        let new_transaction = NewTransaction {
            kind: TransactionKind::Sale,
            amount: dec!(12),
            description: Some("Baguette".to_string()),
            date: Some(date),
        };

        let doc = new_transaction.into_document(now).unwrap();
        assert_eq!(doc.description, "Baguette");
        assert_eq!(doc.date, date);
        // created_at is always the creation instant, not the backdated date
        assert_eq!(doc.created_at, now);
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let new_transaction = NewTransaction {
            kind: TransactionKind::Sale,
            amount: dec!(-5),
            description: None,
            date: None,
        };
        let result = new_transaction.into_document(instant("2024-03-05T09:30:00Z"));
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
    }

    #[test]
    fn test_to_document_drops_only_the_id() {
        let transaction = Transaction {
            id: "txn-1".to_string(),
            kind: TransactionKind::Sale,
            amount: dec!(120),
            description: "Croissant".to_string(),
            date: instant("2024-03-05T09:30:00Z"),
            created_at: instant("2024-03-05T09:31:00Z"),
        };

        let doc = transaction.to_document();
        assert_eq!(doc.kind, transaction.kind);
        assert_eq!(doc.amount, transaction.amount);
        assert_eq!(doc.description, transaction.description);
        assert_eq!(doc.date, transaction.date);
        assert_eq!(doc.created_at, transaction.created_at);
    }

    #[test]
    fn test_date_range_days_normalizes_to_full_days() {
        let range = DateRange::days(
            instant("2024-03-01T14:20:00Z"),
            instant("2024-03-10T08:05:00Z"),
        );
        assert_eq!(range.start, instant("2024-03-01T00:00:00Z"));
        assert_eq!(range.end, instant("2024-03-10T23:59:59.999Z"));

        // Bounds are inclusive on both ends
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(instant("2024-02-29T23:59:59.999Z")));
        assert!(!range.contains(instant("2024-03-11T00:00:00Z")));
    }

    #[test]
    fn test_filter_combines_kind_and_range() {
        let in_range_sale = Transaction {
            id: "txn-1".to_string(),
            kind: TransactionKind::Sale,
            amount: dec!(10),
            description: "Croissant".to_string(),
            date: instant("2024-03-05T09:30:00Z"),
            created_at: instant("2024-03-05T09:30:00Z"),
        };
        let mut in_range_expense = in_range_sale.clone();
        in_range_expense.kind = TransactionKind::Expense;
        let mut out_of_range_sale = in_range_sale.clone();
        out_of_range_sale.date = instant("2024-04-01T09:30:00Z");

        let filter = TransactionFilter::for_kind_in_range(
            TransactionKind::Sale,
            DateRange::days(
                instant("2024-03-01T00:00:00Z"),
                instant("2024-03-31T00:00:00Z"),
            ),
        );
        assert!(filter.matches(&in_range_sale));
        assert!(!filter.matches(&in_range_expense));
        assert!(!filter.matches(&out_of_range_sale));

        assert!(TransactionFilter::all().matches(&out_of_range_sale));
    }
}
