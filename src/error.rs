use crate::domain::order::OrderId;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which kind of record failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Order,
    Payment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Order => f.write_str("order"),
            RecordKind::Payment => f.write_str("payment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Malformed {kind} record: {reason}")]
    MalformedInput { kind: RecordKind, reason: String },
    #[error("Duplicate order id: {0}")]
    DuplicateOrder(OrderId),
    #[error("Payment fetch failed: {0}")]
    FetchFailure(#[from] FetchError),
}

impl SyncError {
    pub fn malformed(kind: RecordKind, reason: impl Into<String>) -> Self {
        SyncError::MalformedInput {
            kind,
            reason: reason.into(),
        }
    }
}

/// Failures reported by a payment source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
