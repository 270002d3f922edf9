use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Time coordinate of a time-varying attribute sample.
///
/// Always finite, totally ordered, and usable as a map key.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TimeCode(f64);

impl TimeCode {
    /// Create a time code, rejecting NaN and infinities.
    pub fn new(value: f64) -> Result<Self, TypeError> {
        if value.is_finite() {
            // Collapse -0.0 so equal times compare and hash identically.
            Ok(Self(if value == 0.0 { 0.0 } else { value }))
        } else {
            Err(TypeError::NonFiniteTime(value.to_string()))
        }
    }

    /// The time coordinate `0.0`.
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// The raw value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for TimeCode {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for TimeCode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeCode {}

impl PartialOrd for TimeCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for TimeCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Debug for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeCode({})", self.0)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for TimeCode {
    type Error = TypeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeCode> for f64 {
    fn from(time: TimeCode) -> Self {
        time.0
    }
}
