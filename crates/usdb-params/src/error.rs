//! Error types for attribute and array operations.

use thiserror::Error;
use usdb_types::DataType;

/// Errors from setting, resetting, or building attribute values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParamError {
    /// The schema of this object kind declares no such attribute.
    #[error("unknown parameter '{name}' on {kind}")]
    UnknownParam { kind: &'static str, name: String },

    /// The value's type does not match the declared type.
    #[error("parameter '{name}' expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: DataType,
        actual: DataType,
    },

    /// Array payload does not agree with its element type or layout.
    #[error("invalid array data: {0}")]
    InvalidArray(String),
}

/// A data array shape that cannot be ingested as a 1-D dense attribute.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("'{object}' commit failed: '{attribute}' array has to be 1-dimensional.")]
    NotOneDimensional { object: String, attribute: String },

    #[error("'{object}' commit failed: '{attribute}' layout strides should all be 0.")]
    Strided { object: String, attribute: String },
}

/// Convenience type alias for attribute operations.
pub type Result<T> = std::result::Result<T, ParamError>;
