// ⚠️ Error taxonomy
//
// Two families:
//   CatalogError - startup, fatal. No partial catalog is ever presented.
//   SessionError - in-session, recoverable. Reported and the menu re-prompts.

use thiserror::Error;

/// Failure while reading or parsing one of the two catalog sources.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {source_name}: {message}")]
    Xml { source_name: String, message: String },

    #[error("car #{car} is missing required element <{element}>")]
    MissingElement { car: usize, element: &'static str },

    #[error("car #{car} has a <price> without a currency attribute")]
    MissingCurrency { car: usize },

    #[error("car #{car} has a non-numeric {currency} price: {value:?}")]
    InvalidPrice {
        car: usize,
        currency: String,
        value: String,
    },

    #[error("line {line}: unparsable release date {value:?}")]
    InvalidDate { line: usize, value: String },

    #[error("failed to read CSV line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("{path} is not a {expected} source (expected a .{extension} file)")]
    WrongSource {
        path: String,
        expected: &'static str,
        extension: &'static str,
    },

    #[error("{cars} cars but {brands} brand rows (strict merge)")]
    LengthMismatch { cars: usize, brands: usize },
}

/// Recoverable failure inside the interactive session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid menu choice: {0:?}")]
    InvalidMenuChoice(String),

    #[error("invalid date: {0:?}")]
    InvalidDateInput(String),

    #[error("invalid price: {0:?}")]
    InvalidPriceInput(String),

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
