use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{History, Transaction};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    date_range_start TEXT,
    date_range_end TEXT,
    checksum TEXT
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    transaction_id TEXT,
    completed_at TEXT NOT NULL,
    details TEXT NOT NULL,
    transaction_type TEXT NOT NULL,
    amount REAL NOT NULL,
    balance REAL,
    category TEXT NOT NULL,
    import_id INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (import_id) REFERENCES imports(id)
);

CREATE INDEX IF NOT EXISTS idx_transactions_completed_at ON transactions(completed_at);
";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Whether an earlier import already stored this row. Rows of the import in
/// progress never count, so repeated identical rows within one statement are kept.
fn is_duplicate_row(
    conn: &Connection,
    txn: &Transaction,
    completed_at: &str,
    import_id: i64,
) -> Result<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM transactions WHERE completed_at = ?1 AND amount = ?2 AND details = ?3 \
         AND transaction_id IS ?4 AND import_id IS NOT ?5",
    )?;
    Ok(stmt.exists(rusqlite::params![completed_at, txn.amount, txn.details, txn.id, import_id])?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendResult {
    pub imported: usize,
    pub skipped: usize,
    pub duplicate_file: bool,
}

/// Append one statement's transactions in a single SQLite transaction. A file whose
/// checksum was already imported is skipped as a whole; rows already present are
/// skipped one by one.
pub fn append_statement(
    conn: &mut Connection,
    filename: &str,
    file_checksum: &str,
    txns: &[Transaction],
) -> Result<AppendResult> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare("SELECT 1 FROM imports WHERE checksum = ?1")?;
        if stmt.exists([file_checksum])? {
            return Ok(AppendResult {
                imported: 0,
                skipped: 0,
                duplicate_file: true,
            });
        }
    }

    let min_date = txns.iter().map(|t| t.timestamp).min();
    let max_date = txns.iter().map(|t| t.timestamp).max();
    tx.execute(
        "INSERT INTO imports (filename, record_count, date_range_start, date_range_end, checksum) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            filename,
            txns.len() as i64,
            min_date.map(|d| d.format("%Y-%m-%d").to_string()),
            max_date.map(|d| d.format("%Y-%m-%d").to_string()),
            file_checksum,
        ],
    )?;
    let import_id = tx.last_insert_rowid();

    let mut imported = 0usize;
    let mut skipped = 0usize;
    for txn in txns {
        let completed_at = txn.timestamp.format(TIMESTAMP_FORMAT).to_string();
        if is_duplicate_row(&tx, txn, &completed_at, import_id)? {
            skipped += 1;
            continue;
        }
        tx.execute(
            "INSERT INTO transactions (transaction_id, completed_at, details, transaction_type, amount, balance, category, import_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                txn.id,
                completed_at,
                txn.details,
                txn.type_hint,
                txn.amount,
                txn.balance,
                txn.category.label(),
                import_id,
            ],
        )?;
        imported += 1;
    }
    tx.commit()?;

    Ok(AppendResult {
        imported,
        skipped,
        duplicate_file: false,
    })
}

/// Every stored row as parallel series, oldest first.
pub fn load_history(conn: &Connection) -> Result<History> {
    let mut stmt = conn.prepare(
        "SELECT completed_at, amount, details, category FROM transactions \
         ORDER BY completed_at ASC, id ASC",
    )?;
    let rows: Vec<(String, f64, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut history = History::default();
    for (date, amount, details, category) in rows {
        history.dates.push(date);
        history.income.push(if amount > 0.0 { amount } else { 0.0 });
        history.expenses.push(if amount < 0.0 { amount.abs() } else { 0.0 });
        history.details.push(details);
        history.types.push(category);
    }
    Ok(history)
}

pub struct StoreCounts {
    pub imports: i64,
    pub transactions: i64,
}

pub fn counts(conn: &Connection) -> Result<StoreCounts> {
    let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;
    let transactions: i64 = conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
    Ok(StoreCounts {
        imports,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::categorize;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn txn(id: &str, when: &str, amount: f64, details: &str) -> Transaction {
        Transaction {
            id: Some(id.to_string()),
            timestamp: chrono::NaiveDateTime::parse_from_str(when, TIMESTAMP_FORMAT).unwrap(),
            details: details.to_string(),
            type_hint: String::new(),
            amount,
            balance: None,
            category: categorize(details, "", Some(amount)),
        }
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["imports", "transactions"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(checksum(b"abc"), checksum(b"abc"));
        assert_ne!(checksum(b"abc"), checksum(b"abd"));
        assert_eq!(checksum(b"").len(), 64);
    }

    #[test]
    fn test_append_and_load_history() {
        let (_dir, mut conn) = test_db();
        let txns = vec![
            txn("SAB1CD2EF4", "2024-01-05 12:00:00", 1000.0, "Funds received from John"),
            txn("SAB1CD2EF3", "2024-01-05 10:00:00", -500.0, "Airtime Purchase"),
        ];
        let result = append_statement(&mut conn, "stmt.csv", "sum1", &txns).unwrap();
        assert_eq!(result.imported, 2);
        assert!(!result.duplicate_file);

        let history = load_history(&conn).unwrap();
        assert_eq!(history.dates, vec!["2024-01-05 10:00:00", "2024-01-05 12:00:00"]);
        assert_eq!(history.income, vec![0.0, 1000.0]);
        assert_eq!(history.expenses, vec![500.0, 0.0]);
        assert_eq!(history.types, vec!["Airtime", "Money In (Individual)"]);
        assert_eq!(history.details[0], "Airtime Purchase");
    }

    #[test]
    fn test_duplicate_file_is_skipped() {
        let (_dir, mut conn) = test_db();
        let txns = vec![txn("SAB1CD2EF3", "2024-01-05 10:00:00", -500.0, "Airtime Purchase")];
        append_statement(&mut conn, "stmt.csv", "same", &txns).unwrap();
        let again = append_statement(&mut conn, "stmt.csv", "same", &txns).unwrap();
        assert!(again.duplicate_file);
        assert_eq!(again.imported, 0);
        assert_eq!(counts(&conn).unwrap().transactions, 1);
    }

    #[test]
    fn test_duplicate_rows_are_skipped() {
        let (_dir, mut conn) = test_db();
        let first = vec![
            txn("SAB1CD2EF3", "2024-01-05 10:00:00", -500.0, "Airtime Purchase"),
            txn("SAB1CD2EF4", "2024-01-06 10:00:00", -50.0, "Airtime Purchase"),
        ];
        append_statement(&mut conn, "a.csv", "a", &first).unwrap();
        let second = vec![
            txn("SAB1CD2EF4", "2024-01-06 10:00:00", -50.0, "Airtime Purchase"),
            txn("SAB1CD2EF5", "2024-01-07 10:00:00", -70.0, "Airtime Purchase"),
        ];
        let result = append_statement(&mut conn, "b.csv", "b", &second).unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 1);
        let c = counts(&conn).unwrap();
        assert_eq!(c.imports, 2);
        assert_eq!(c.transactions, 3);
    }

    #[test]
    fn test_rows_without_id_are_deduplicated() {
        let (_dir, mut conn) = test_db();
        let mut t = txn("X", "2024-01-05 10:00:00", -5.0, "Airtime");
        t.id = None;
        append_statement(&mut conn, "a.csv", "a", &[t.clone()]).unwrap();
        let result = append_statement(&mut conn, "b.csv", "b", &[t]).unwrap();
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_repeated_rows_in_one_statement_are_all_kept() {
        let (_dir, mut conn) = test_db();
        let mut t = txn("X", "2024-01-05 00:00:00", -50.0, "Airtime Purchase");
        t.id = None;
        let result = append_statement(&mut conn, "a.csv", "a", &[t.clone(), t.clone()]).unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 0);

        let history = load_history(&conn).unwrap();
        assert_eq!(history.expenses.iter().sum::<f64>(), 100.0);

        // A later statement repeating the row is still recognised.
        let again = append_statement(&mut conn, "b.csv", "b", &[t]).unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.skipped, 1);
    }

    #[test]
    fn test_empty_history() {
        let (_dir, conn) = test_db();
        let history = load_history(&conn).unwrap();
        assert!(history.dates.is_empty());
        assert!(history.types.is_empty());
    }
}
