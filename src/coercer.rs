use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::normalizer::{ColumnMap, Field};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d %Y"];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Keep digits, `.` and `-`, then parse. `"KES 1,250.00"` -> `1250.0`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Debit/credit style operands: digits and `.` only, missing or bad values are 0.
pub fn parse_magnitude(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Typed view of one raw row before categorization and filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedRow {
    pub id: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub details: String,
    pub type_hint: String,
    pub amount: Option<f64>,
    pub balance: Option<f64>,
}

// (positive side, negative side), tried in order when there is no amount column.
const AMOUNT_PAIRS: &[(Field, Field)] = &[
    (Field::Credit, Field::Debit),
    (Field::Deposited, Field::Withdrawn),
    (Field::Deposit, Field::Withdrawal),
];

pub fn coerce_row(columns: &ColumnMap, row: &[String]) -> CoercedRow {
    CoercedRow {
        id: columns.get(row, Field::TransactionId).map(|s| s.trim().to_string()),
        timestamp: timestamp_for(columns, row),
        details: columns.get(row, Field::Details).unwrap_or("").to_string(),
        type_hint: columns.get(row, Field::TransactionType).unwrap_or("").to_string(),
        amount: amount_for(columns, row),
        balance: columns.get(row, Field::Balance).and_then(parse_number),
    }
}

fn timestamp_for(columns: &ColumnMap, row: &[String]) -> Option<NaiveDateTime> {
    if let Some(combined) = columns.get(row, Field::CompletionTime) {
        return parse_timestamp(combined);
    }
    match (columns.get(row, Field::Date), columns.get(row, Field::Time)) {
        (Some(date), Some(time)) => parse_timestamp(&format!("{} {}", date.trim(), time.trim())),
        (Some(date), None) => parse_timestamp(date),
        _ => None,
    }
}

fn amount_for(columns: &ColumnMap, row: &[String]) -> Option<f64> {
    if let Some(raw) = columns.get(row, Field::Amount) {
        return parse_number(raw);
    }
    AMOUNT_PAIRS
        .iter()
        .find(|(inflow, outflow)| columns.has(*inflow) && columns.has(*outflow))
        .map(|(inflow, outflow)| {
            parse_magnitude(columns.get(row, *inflow)) - parse_magnitude(columns.get(row, *outflow))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn coerce(headers: &[&str], row: &[&str]) -> CoercedRow {
        let columns = ColumnMap::from_headers(&strings(headers));
        coerce_row(&columns, &strings(row))
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        assert_eq!(parse_timestamp("2024-01-05 14:30:00"), Some(ts("2024-01-05 14:30:00")));
        assert_eq!(parse_timestamp("2024-01-05T14:30:00"), Some(ts("2024-01-05 14:30:00")));
        assert_eq!(parse_timestamp("01/05/2024 2:30 PM"), Some(ts("2024-01-05 14:30:00")));
        assert_eq!(parse_timestamp("2024-01-05"), Some(ts("2024-01-05 00:00:00")));
        assert_eq!(parse_timestamp("2024-01-05T14:30:00+03:00"), Some(ts("2024-01-05 14:30:00")));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-02-30 10:00:00"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,250.00"), Some(1250.0));
        assert_eq!(parse_number("KES -500"), Some(-500.0));
        assert_eq!(parse_number("  42 "), Some(42.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("10-5"), None);
    }

    #[test]
    fn test_parse_magnitude_drops_sign() {
        assert_eq!(parse_magnitude(Some("-500.00")), 500.0);
        assert_eq!(parse_magnitude(Some("1,000")), 1000.0);
        assert_eq!(parse_magnitude(Some("")), 0.0);
        assert_eq!(parse_magnitude(None), 0.0);
    }

    #[test]
    fn test_direct_amount_column() {
        let row = coerce(&["Completion Time", "Amount"], &["2024-01-05 10:00:00", "-1,500.50"]);
        assert_eq!(row.amount, Some(-1500.5));
    }

    #[test]
    fn test_amount_from_debit_credit() {
        let row = coerce(&["Date", "Debit", "Credit"], &["2024-01-05", "200", "0"]);
        assert_eq!(row.amount, Some(-200.0));
    }

    #[test]
    fn test_amount_from_paid_in_and_withdrawn() {
        let row = coerce(&["Completion Time", "Paid In", "Withdrawn"], &["2024-01-05 10:00:00", "", "-350.00"]);
        assert_eq!(row.amount, Some(-350.0));
        let row = coerce(&["Completion Time", "Paid In", "Withdrawn"], &["2024-01-05 10:00:00", "1,000.00", ""]);
        assert_eq!(row.amount, Some(1000.0));
    }

    #[test]
    fn test_amount_from_deposit_withdrawal() {
        let row = coerce(&["Date", "Deposit", "Withdrawal"], &["2024-01-05", "", "75"]);
        assert_eq!(row.amount, Some(-75.0));
    }

    #[test]
    fn test_credit_debit_wins_over_later_pairs() {
        let row = coerce(
            &["Date", "Debit", "Credit", "Deposit", "Withdrawal"],
            &["2024-01-05", "10", "0", "999", "0"],
        );
        assert_eq!(row.amount, Some(-10.0));
    }

    #[test]
    fn test_half_a_pair_is_not_enough() {
        let row = coerce(&["Date", "Debit"], &["2024-01-05", "10"]);
        assert_eq!(row.amount, None);
    }

    #[test]
    fn test_invalid_amount_is_none() {
        let row = coerce(&["Date", "Amount"], &["2024-01-05", "pending"]);
        assert_eq!(row.amount, None);
    }

    #[test]
    fn test_date_and_time_columns_are_joined() {
        let row = coerce(&["Date", "Time", "Amount"], &["2024-03-01", "08:15:00", "5"]);
        assert_eq!(row.timestamp, Some(ts("2024-03-01 08:15:00")));
    }

    #[test]
    fn test_combined_column_preferred_over_date_time() {
        let row = coerce(
            &["Completion Time", "Date", "Time"],
            &["2024-03-02 09:00:00", "2024-03-01", "08:15:00"],
        );
        assert_eq!(row.timestamp, Some(ts("2024-03-02 09:00:00")));
    }

    #[test]
    fn test_missing_columns_default() {
        let row = coerce(&["Amount"], &["10"]);
        assert_eq!(row.timestamp, None);
        assert_eq!(row.details, "");
        assert_eq!(row.type_hint, "");
        assert_eq!(row.id, None);
        assert_eq!(row.balance, None);
    }
}
