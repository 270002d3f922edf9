use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a status report.
///
/// Ordered from least to most severe so sinks can filter with `>=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational message, no action required.
    Info,
    /// A policy fallback was applied; the operation continued.
    Warning,
    /// The current operation on the reporting object was aborted.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Status code attached to a status report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// Benign report; nothing failed.
    NoError,
    /// A collaborator failed for a reason outside the caller's control.
    UnknownError,
    /// Wrong type, wrong layout, wrong buffer size, or a bad handle.
    InvalidArgument,
    /// A required attribute or dependency is missing.
    InvalidOperation,
}

impl StatusCode {
    /// Returns `true` for every code other than [`StatusCode::NoError`].
    pub fn is_error(self) -> bool {
        self != StatusCode::NoError
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCode::NoError => "no error",
            StatusCode::UnknownError => "unknown error",
            StatusCode::InvalidArgument => "invalid argument",
            StatusCode::InvalidOperation => "invalid operation",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn only_no_error_is_benign() {
        assert!(!StatusCode::NoError.is_error());
        assert!(StatusCode::InvalidArgument.is_error());
        assert!(StatusCode::InvalidOperation.is_error());
        assert!(StatusCode::UnknownError.is_error());
    }

    #[test]
    fn serde_is_snake_case() {
        let json = serde_json::to_string(&StatusCode::InvalidArgument).unwrap();
        assert_eq!(json, "\"invalid_argument\"");
        let sev: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(sev, Severity::Warning);
    }
}
