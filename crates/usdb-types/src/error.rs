use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown data type: {0}")]
    UnknownDataType(String),

    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("time code must be finite, got {0}")]
    NonFiniteTime(String),
}
