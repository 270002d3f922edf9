//! The status channel.
//!
//! Every validation failure and every policy fallback is delivered as one
//! [`StatusReport`] to the device's [`StatusSink`]. The default sink,
//! [`TracingSink`], turns reports into `tracing` events; [`RecordingSink`]
//! keeps them for inspection.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::{error, info, warn};
use usdb_types::{DataType, ObjectHandle, Severity, StatusCode};

/// One diagnostic delivered on the status channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusReport {
    /// Object the report is about. `None` for device-level reports.
    pub source: Option<ObjectHandle>,
    /// Type tag of the source (`DEVICE` for device-level reports).
    pub source_type: DataType,
    pub severity: Severity,
    pub code: StatusCode,
    pub message: String,
}

impl StatusReport {
    pub fn new(
        source: Option<ObjectHandle>,
        source_type: DataType,
        severity: Severity,
        code: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            source_type,
            severity,
            code,
            message: message.into(),
        }
    }
}

/// Receiver of status reports.
pub trait StatusSink: Send + Sync {
    fn report(&self, report: StatusReport);
}

/// Forwards reports to `tracing` at the matching level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn report(&self, report: StatusReport) {
        let object = report.source.map(|h| h.raw());
        let kind = report.source_type.name();
        match report.severity {
            Severity::Info => info!(?object, kind, code = %report.code, "{}", report.message),
            Severity::Warning => warn!(?object, kind, code = %report.code, "{}", report.message),
            Severity::Error => error!(?object, kind, code = %report.code, "{}", report.message),
        }
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<StatusReport>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports received so far, oldest first.
    pub fn reports(&self) -> Vec<StatusReport> {
        self.lock().clone()
    }

    /// Reports at exactly `severity`.
    pub fn with_severity(&self, severity: Severity) -> Vec<StatusReport> {
        self.lock()
            .iter()
            .filter(|r| r.severity == severity)
            .cloned()
            .collect()
    }

    /// Reports at [`Severity::Error`].
    pub fn errors(&self) -> Vec<StatusReport> {
        self.with_severity(Severity::Error)
    }

    /// Reports at [`Severity::Warning`].
    pub fn warnings(&self) -> Vec<StatusReport> {
        self.with_severity(Severity::Warning)
    }

    /// Number of reports received.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all recorded reports.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StatusReport>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, report: StatusReport) {
        self.lock().push(report);
    }
}
