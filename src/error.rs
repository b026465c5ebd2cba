use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "xlsx")]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] calamine::Error),

    #[cfg(feature = "xlsx")]
    #[error("Worksheet {0} not found")]
    MissingSheet(usize),

    #[error("Key '{0}' not found in row")]
    MissingKey(String),

    #[error("Cannot convert '{0}' to a decimal")]
    InvalidDecimal(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Unrecognized word for sign conversion: {0}")]
    UnknownSign(String),

    #[error("Transaction type '{0}' not recognized")]
    UnknownTransactionType(String),

    #[error("Exactly one of deposit ({deposit}) and withdrawal ({withdrawal}) must be non-zero")]
    AmbiguousAmount { deposit: String, withdrawal: String },

    #[error("Invalid date '{value}' for '{key}' (format '{format}')")]
    InvalidDate {
        key: String,
        value: String,
        format: String,
    },

    #[error("Posting date {posting} is later than transaction date {transaction}")]
    DateOrder {
        posting: chrono::NaiveDate,
        transaction: chrono::NaiveDate,
    },

    #[error("The provided filepath is empty")]
    EmptyPath,

    #[error("The filename pattern cannot be empty")]
    EmptyPattern,

    #[error("Invalid filename pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Filename '{filename}' does not match pattern '{pattern}'")]
    FilenameMismatch { filename: String, pattern: String },

    #[error("max_length cannot be negative except for -1 (got {0})")]
    InvalidMaxLength(i64),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Unknown importer: {0}")]
    UnknownImporter(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
