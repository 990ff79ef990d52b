use tracing::{debug, warn};

use crate::aggregator::summarize;
use crate::coercer::coerce_row;
use crate::filter::{accept, FilterOptions};
use crate::models::{ChartData, RawTable, Transaction};
use crate::normalizer::{canonical_headers, ColumnMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub validate_transaction_ids: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validate_transaction_ids: true,
        }
    }
}

pub struct Processed {
    pub transactions: Vec<Transaction>,
    pub charts: ChartData,
    pub dropped: usize,
}

/// Normalize, coerce, categorize and filter every row of `table`.
pub fn extract_transactions(table: &RawTable, config: &PipelineConfig) -> (Vec<Transaction>, usize) {
    let columns = ColumnMap::from_headers(&table.headers);
    debug!(columns = ?canonical_headers(&table.headers), "normalized headers");
    let options = FilterOptions {
        validate_ids: config.validate_transaction_ids,
    };
    let mut transactions = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in &table.rows {
        match accept(coerce_row(&columns, row), options) {
            Some(txn) => transactions.push(txn),
            None => dropped += 1,
        }
    }
    (transactions, dropped)
}

/// Full pipeline: raw table in, transactions and the five chart views out.
pub fn process(table: &RawTable, config: &PipelineConfig) -> Processed {
    let (transactions, dropped) = extract_transactions(table, config);
    debug!(
        rows = table.rows.len(),
        kept = transactions.len(),
        dropped,
        "statement rows processed"
    );
    if transactions.is_empty() && !table.is_empty() {
        warn!(rows = table.rows.len(), "no valid transactions found in statement");
    }
    let charts = summarize(&transactions);
    Processed {
        transactions,
        charts,
        dropped,
    }
}
