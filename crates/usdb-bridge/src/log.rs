use std::fmt;

use serde::Serialize;

/// Level of a diagnostic emitted by the bridge itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BridgeLogLevel {
    Status,
    Warning,
    Error,
}

/// A queued bridge diagnostic, drained and forwarded by the device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BridgeLogEntry {
    pub level: BridgeLogLevel,
    pub message: String,
}

impl BridgeLogEntry {
    pub fn new(level: BridgeLogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for BridgeLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.message)
    }
}
