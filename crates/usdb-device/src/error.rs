use usdb_bridge::BridgeError;
use usdb_params::{LayoutError, ParamError};
use usdb_types::{DataType, ObjectHandle, StatusCode};

/// Errors that abort a single object's commit.
///
/// Every message names the object and, where one is involved, the
/// attribute, so a status report needs no further context.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// A required attribute is not set.
    #[error("'{object}' commit failed: '{attribute}' is missing.")]
    MissingAttribute {
        object: String,
        attribute: &'static str,
    },

    /// An array failed the one-dimensional or density check.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A bulk data array holds something other than numeric scalars.
    #[error("'{object}' commit failed: '{attribute}' has incompatible element type {actual}.")]
    IncompatibleElementType {
        object: String,
        attribute: &'static str,
        actual: DataType,
    },

    /// A reference array's declared element type is not the expected kind.
    #[error("'{object}' commit failed: '{attribute}' array elements should be of type {expected}, found {actual}.")]
    ReferenceType {
        object: String,
        attribute: &'static str,
        expected: DataType,
        actual: DataType,
    },

    /// A referenced object exists but has never been committed.
    #[error("'{object}' commit failed: '{attribute}' element {index} ({target}) has not been committed yet.")]
    UncommittedReference {
        object: String,
        attribute: &'static str,
        index: usize,
        target: ObjectHandle,
    },

    /// A referenced handle names no live object, or an object of another kind.
    #[error("'{object}' commit failed: '{attribute}' element {index} ({target}) is not a live {expected} object.")]
    InvalidReference {
        object: String,
        attribute: &'static str,
        index: usize,
        target: ObjectHandle,
        expected: DataType,
    },

    /// The time step attribute is not a finite number.
    #[error("'{object}' commit failed: time step {value} is not finite.")]
    InvalidTimeStep { object: String, value: f64 },

    /// The bridge rejected a write.
    #[error("'{object}' commit failed: {source}")]
    Bridge {
        object: String,
        #[source]
        source: BridgeError,
    },
}

impl CommitError {
    /// Status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CommitError::MissingAttribute { .. } | CommitError::UncommittedReference { .. } => {
                StatusCode::InvalidOperation
            }
            CommitError::Layout(_)
            | CommitError::IncompatibleElementType { .. }
            | CommitError::ReferenceType { .. }
            | CommitError::InvalidReference { .. }
            | CommitError::InvalidTimeStep { .. } => StatusCode::InvalidArgument,
            CommitError::Bridge { .. } => StatusCode::UnknownError,
        }
    }
}

/// Errors returned by [`Device`](crate::Device) operations.
///
/// Each one has already been reported on the status channel when it is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The handle names no live object.
    #[error("unknown object: {0}")]
    UnknownObject(ObjectHandle),

    /// An attribute could not be stored.
    #[error("'{object}' {source}")]
    Param {
        object: String,
        #[source]
        source: ParamError,
    },

    /// The object's commit was aborted.
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// A fixed-size property was queried with a buffer of the wrong size.
    #[error("'{object}' property '{property}' needs a {expected}-byte buffer, got {actual}.")]
    PropertyBuffer {
        object: String,
        property: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A bridge call outside of a commit failed.
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl DeviceError {
    /// Status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::Commit(e) => e.status_code(),
            DeviceError::Bridge(_) => StatusCode::UnknownError,
            DeviceError::UnknownObject(_)
            | DeviceError::Param { .. }
            | DeviceError::PropertyBuffer { .. }
            | DeviceError::Config(_) => StatusCode::InvalidArgument,
        }
    }
}

/// Result alias for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// A string that names no object kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown object kind: {0:?}")]
pub struct UnknownKind(pub String);
