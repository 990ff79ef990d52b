use std::sync::LazyLock;

use regex::Regex;

use crate::categorizer::categorize;
use crate::coercer::CoercedRow;
use crate::models::Transaction;

static TRANSACTION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{10,}$").expect("valid transaction id pattern"));

pub fn is_valid_transaction_id(id: &str) -> bool {
    TRANSACTION_ID.is_match(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Drop rows whose id does not look like a receipt number. Only applies when the
    /// table has an id column.
    pub validate_ids: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self { validate_ids: true }
    }
}

/// Categorize a coerced row and keep it only if it is complete. Returns `None` for
/// rows the filter discards.
pub fn accept(row: CoercedRow, options: FilterOptions) -> Option<Transaction> {
    let category = categorize(&row.details, &row.type_hint, row.amount);
    let timestamp = row.timestamp?;
    let amount = row.amount?;
    if options.validate_ids {
        if let Some(id) = &row.id {
            if !is_valid_transaction_id(id) {
                return None;
            }
        }
    }
    Some(Transaction {
        id: row.id,
        timestamp,
        details: row.details,
        type_hint: row.type_hint,
        amount,
        balance: row.balance,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::Category;

    fn row(id: Option<&str>, amount: Option<f64>, with_time: bool) -> CoercedRow {
        CoercedRow {
            id: id.map(str::to_string),
            timestamp: with_time.then(|| {
                chrono::NaiveDate::from_ymd_opt(2024, 1, 5)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap()
            }),
            details: "Airtime Purchase".to_string(),
            type_hint: String::new(),
            amount,
            balance: None,
        }
    }

    #[test]
    fn test_transaction_id_pattern() {
        assert!(is_valid_transaction_id("SAB1CD2EF3"));
        assert!(is_valid_transaction_id("RKL7X9Q2MZ45"));
        assert!(!is_valid_transaction_id("sab1cd2ef3"));
        assert!(!is_valid_transaction_id("SAB1CD2EF"));
        assert!(!is_valid_transaction_id(""));
        assert!(!is_valid_transaction_id("SAB1-CD2EF3"));
    }

    #[test]
    fn test_keeps_complete_rows() {
        let txn = accept(row(Some("SAB1CD2EF3"), Some(-500.0), true), FilterOptions::default()).unwrap();
        assert_eq!(txn.amount, -500.0);
        assert_eq!(txn.category, Category::Airtime);
    }

    #[test]
    fn test_drops_missing_timestamp_or_amount() {
        assert!(accept(row(None, Some(-500.0), false), FilterOptions::default()).is_none());
        assert!(accept(row(None, None, true), FilterOptions::default()).is_none());
    }

    #[test]
    fn test_drops_bad_id_only_when_validating() {
        let opts = FilterOptions { validate_ids: false };
        assert!(accept(row(Some("abc"), Some(-1.0), true), FilterOptions::default()).is_none());
        assert!(accept(row(Some("abc"), Some(-1.0), true), opts).is_some());
    }

    #[test]
    fn test_zero_amount_survives_as_unknown() {
        let txn = accept(row(None, Some(0.0), true), FilterOptions::default()).unwrap();
        assert_eq!(txn.category, Category::Unknown);
    }
}
