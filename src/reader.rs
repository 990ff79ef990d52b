use std::path::Path;

use tracing::debug;

use crate::error::{PesaError, Result};
use crate::models::RawTable;

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    #[cfg(feature = "excel")]
    Excel,
}

impl TableFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            #[cfg(feature = "excel")]
            Self::Excel => "excel",
        }
    }

    /// Pick a reader from the file name alone; content is never sniffed.
    pub fn from_filename(filename: &str) -> Option<TableFormat> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".csv") {
            return Some(Self::Csv);
        }
        #[cfg(feature = "excel")]
        {
            if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
                return Some(Self::Excel);
            }
        }
        None
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<RawTable> {
        debug!(format = self.key(), bytes = bytes.len(), "reading statement table");
        match self {
            Self::Csv => parse_csv(bytes),
            #[cfg(feature = "excel")]
            Self::Excel => parse_excel(bytes),
        }
    }
}

pub fn read_bytes(filename: &str, bytes: &[u8]) -> Result<RawTable> {
    let format = TableFormat::from_filename(filename)
        .ok_or_else(|| PesaError::UnsupportedFormat(filename.to_string()))?;
    format.parse(bytes)
}

pub fn read_file(file_path: &Path) -> Result<RawTable> {
    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    read_bytes(filename, &std::fs::read(file_path)?)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn parse_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| PesaError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PesaError::Parse("No columns to parse from file".to_string()));
    }
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| PesaError::Parse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable::new(headers, rows))
}

// ---------------------------------------------------------------------------
// Excel (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "excel")]
fn parse_excel(bytes: &[u8]) -> Result<RawTable> {
    use calamine::Reader;

    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| PesaError::Parse(format!("Failed to open spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PesaError::Parse("Spreadsheet has no worksheets".to_string()))?
        .map_err(|e| PesaError::Parse(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(PesaError::Parse("No columns to parse from file".to_string()));
    };
    let headers: Vec<String> = header_row.iter().map(cell_text).collect();
    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(RawTable::new(headers, rows))
}

#[cfg(feature = "excel")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64()),
    }
}

/// Render an Excel serial date as text the timestamp parser understands. Whole
/// numbers become a date, values below one a time of day. Serials outside the
/// calendar range come back as the plain number, which no timestamp format accepts.
#[cfg(any(feature = "excel", test))]
pub fn excel_serial_to_text(serial: f64) -> String {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let when = serial
        .is_finite()
        .then(|| (serial * 86_400_000.0).round() as i64)
        .and_then(chrono::TimeDelta::try_milliseconds)
        .and_then(|offset| base.checked_add_signed(offset));
    let Some(when) = when else {
        return serial.to_string();
    };
    if serial < 1.0 {
        when.format("%H:%M:%S").to_string()
    } else if serial.fract() == 0.0 {
        when.format("%Y-%m-%d").to_string()
    } else {
        when.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
