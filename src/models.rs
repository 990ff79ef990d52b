use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::categorizer::Category;

/// Uploaded table before any column mapping: a header row plus text cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<String>,
    pub timestamp: NaiveDateTime,
    pub details: String,
    pub type_hint: String,
    pub amount: f64,
    pub balance: Option<f64>,
    pub category: Category,
}

/// One chart series: `labels[i]` describes `data[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl Series {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut series = Series::default();
        for (label, value) in pairs {
            series.labels.push(label.into());
            series.data.push(value);
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The five dashboard views produced from one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub monthly_spending: Series,
    pub category: Series,
    pub daily_trend: Series,
    pub money_in: Series,
    pub money_out: Series,
}

/// Stored rows as parallel arrays, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub dates: Vec<String>,
    pub income: Vec<f64>,
    pub expenses: Vec<f64>,
    pub details: Vec<String>,
    pub types: Vec<String>,
}
