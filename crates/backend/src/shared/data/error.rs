use thiserror::Error;

/// Errors raised while obtaining or parsing the sales dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cannot open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Cannot read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("Sheet has no header row")]
    EmptySheet,

    #[error("Column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Row {row}: invalid date '{value}' (expected DD/MM/YYYY)")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}: invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: negative value {value} in column '{column}'")]
    NegativeValue {
        row: usize,
        column: String,
        value: f64,
    },
}
