use thiserror::Error;

#[derive(Error, Debug)]
pub enum PesaError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file type. Please upload an Excel (.xlsx, .xls) or CSV (.csv) file.")]
    UnsupportedFormat(String),

    #[error("Error processing file: {0}. Please ensure it's a valid M-Pesa statement format.")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PesaError>;
