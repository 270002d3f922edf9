//! Attribute storage for the USD scene bridge.
//!
//! Every bridged object owns a [`ParamTable`]: a typed store of named
//! attributes whose layout is fixed by a static [`ParamSchema`] shared by all
//! objects of the same kind. Bulk data travels as [`DataArray`] values whose
//! [`DataLayout`] is checked by the [`layout`] validators before any of it
//! reaches the document.
//!
//! # Modules
//!
//! - [`error`] -- Error types for attribute and array operations
//! - [`value`] -- [`ParamValue`], the dynamically-typed attribute value
//! - [`array`] -- [`DataArray`] and its shape descriptor [`DataLayout`]
//! - [`layout`] -- One-dimensionality and density checks
//! - [`schema`] -- Declarative per-kind attribute schemas
//! - [`table`] -- The per-object [`ParamTable`] with its changed flag
//! - [`naming`] -- Persisted identifier sanitization

pub mod array;
pub mod error;
pub mod layout;
pub mod naming;
pub mod schema;
pub mod table;
pub mod value;

pub use array::{ArrayData, ArrayElement, DataArray, DataLayout};
pub use error::{LayoutError, ParamError};
pub use layout::{assert_dense, assert_one_dimensional};
pub use naming::{is_valid_identifier, sanitize_name, sanitized};
pub use schema::{ParamDecl, ParamSchema, Slot};
pub use table::ParamTable;
pub use value::ParamValue;
