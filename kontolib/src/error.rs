//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KontoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Unsupported parse target: {0}")]
    UnsupportedTarget(String),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

/// Ошибки разбора самого текста выписки. Любая из них прерывает весь разбор.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no line divider found (neither CRLF nor @@)")]
    NoDivider,

    #[error("cd mark not found in: {0}")]
    MissingDirectionMarker(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid balance: {0}")]
    InvalidBalance(String),

    #[error("transaction before any start balance: {0}")]
    TransactionBeforeBalance(String),
}

pub type Result<T> = std::result::Result<T, KontoError>;
