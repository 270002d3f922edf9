//! Foundation types for the USD scene bridge.
//!
//! This crate provides the caller-side type system, its projection onto the
//! scene document's storage types, the status taxonomy used for diagnostics,
//! and the handle types that identify objects on either side of the bridge.
//! Every other `usdb` crate depends on `usdb-types`.
//!
//! # Key Types
//!
//! - [`DataType`] -- Tagged scalar/vector/matrix/object type of an attribute value
//! - [`DocumentType`] -- Native storage type of the scene document
//! - [`Severity`] / [`StatusCode`] -- Status channel taxonomy
//! - [`ObjectHandle`] -- Caller-side identity of a bridged object
//! - [`PrimHandle`] -- Persisted-document identity of a committed object
//! - [`TimeCode`] -- Totally ordered time coordinate for time-varying data

pub mod data_type;
pub mod document_type;
pub mod error;
pub mod handle;
pub mod status;
pub mod time;

pub use data_type::{DataType, UNKNOWN_TYPE_NAME};
pub use document_type::DocumentType;
pub use error::TypeError;
pub use handle::{ObjectHandle, PrimHandle};
pub use status::{Severity, StatusCode};
pub use time::TimeCode;
