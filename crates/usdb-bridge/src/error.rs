use usdb_types::PrimHandle;

use crate::prim::PrimKind;

/// Errors from bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The handle does not name a prim in the document.
    #[error("unknown prim: {0}")]
    UnknownPrim(PrimHandle),

    /// The prim exists but is of another kind than the operation needs.
    #[error("{handle} is a {actual}, expected a {expected}")]
    KindMismatch {
        handle: PrimHandle,
        expected: PrimKind,
        actual: PrimKind,
    },

    /// The requested prim name is not a legal identifier.
    #[error("invalid prim name: {0:?}")]
    InvalidName(String),

    /// The document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Result alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
