//! Header normalization and the static rename table.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TransactionId,
    CompletionTime,
    Date,
    Time,
    Details,
    TransactionType,
    Amount,
    Balance,
    Debit,
    Credit,
    Deposited,
    Withdrawn,
    Deposit,
    Withdrawal,
}

impl Field {
    pub fn key(&self) -> &'static str {
        match self {
            Self::TransactionId => "transaction_id",
            Self::CompletionTime => "completion_time",
            Self::Date => "date",
            Self::Time => "time",
            Self::Details => "details",
            Self::TransactionType => "transaction_type",
            Self::Amount => "amount",
            Self::Balance => "balance",
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Deposited => "deposited",
            Self::Withdrawn => "withdrawn",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

// Normalized source header -> canonical field.
const HEADER_VARIANTS: &[(&str, Field)] = &[
    ("transactioncode", Field::TransactionId),
    ("transactionid", Field::TransactionId),
    ("receiptno", Field::TransactionId),
    ("receipt", Field::TransactionId),
    ("completiontime", Field::CompletionTime),
    ("datetime", Field::CompletionTime),
    ("timestamp", Field::CompletionTime),
    ("transactiontime", Field::CompletionTime),
    ("date", Field::Date),
    ("transactiondate", Field::Date),
    ("time", Field::Time),
    ("details", Field::Details),
    ("description", Field::Details),
    ("narration", Field::Details),
    ("transactiontype", Field::TransactionType),
    ("type", Field::TransactionType),
    ("transactionstatus", Field::TransactionType),
    ("amount", Field::Amount),
    ("transactionamount", Field::Amount),
    ("balance", Field::Balance),
    ("runningbalance", Field::Balance),
    ("debit", Field::Debit),
    ("dr", Field::Debit),
    ("credit", Field::Credit),
    ("cr", Field::Credit),
    ("deposited", Field::Deposited),
    ("paidin", Field::Deposited),
    ("withdrawn", Field::Withdrawn),
    ("paidout", Field::Withdrawn),
    ("deposit", Field::Deposit),
    ("withdrawal", Field::Withdrawal),
];

/// Lower-case, trim, and drop everything that is not an ASCII letter or digit.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

pub fn lookup(normalized: &str) -> Option<Field> {
    HEADER_VARIANTS
        .iter()
        .find(|(variant, _)| *variant == normalized)
        .map(|(_, field)| *field)
}

/// Normalized header name for every column, with known variants replaced by their
/// canonical key. Unknown columns keep their normalized name.
pub fn canonical_headers(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| {
            let normalized = normalize_header(h);
            match lookup(&normalized) {
                Some(field) => field.key().to_string(),
                None => normalized,
            }
        })
        .collect()
}

/// Column positions of the canonical fields found in a header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    positions: Vec<(Field, usize)>,
}

impl ColumnMap {
    pub fn from_headers(headers: &[String]) -> Self {
        let mut positions: Vec<(Field, usize)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            let Some(field) = lookup(&normalize_header(header)) else {
                continue;
            };
            // First column wins when two headers map to the same field.
            if positions.iter().any(|(f, _)| *f == field) {
                continue;
            }
            positions.push((field, idx));
        }
        Self { positions }
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.positions
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }

    pub fn has(&self, field: Field) -> bool {
        self.index(field).is_some()
    }

    /// Cell text for `field` in `row`; `None` when the column is absent.
    pub fn get<'a>(&self, row: &'a [String], field: Field) -> Option<&'a str> {
        let idx = self.index(field)?;
        Some(row.get(idx).map(String::as_str).unwrap_or(""))
    }
}
