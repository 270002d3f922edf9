//! Reference resolution.
//!
//! Turns an array of caller-side object handles into the ordered list of prim
//! handles a container persists, then replaces or clears the container's
//! reference list. Resolution is all-or-nothing: the first handle that cannot
//! be resolved aborts it and no partial list is produced.

use std::collections::HashMap;

use tracing::debug;
use usdb_bridge::{BridgeResult, SceneBridge};
use usdb_params::DataArray;
use usdb_types::{DataType, ObjectHandle, PrimHandle, TimeCode};

use crate::error::CommitError;

/// What resolution needs to know about a live object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedObject {
    pub data_type: DataType,
    /// `None` until the object's first successful commit.
    pub prim: Option<PrimHandle>,
}

/// Read-only view of the live object set.
pub trait ObjectLookup {
    fn lookup(&self, handle: ObjectHandle) -> Option<ResolvedObject>;
}

impl ObjectLookup for HashMap<ObjectHandle, ResolvedObject> {
    fn lookup(&self, handle: ObjectHandle) -> Option<ResolvedObject> {
        self.get(&handle).copied()
    }
}

/// Resolve every element of `array`, preserving order and duplicates.
///
/// The array's declared element type must equal `expected`, and every
/// element must name a live object of that type that has been committed.
pub fn resolve_references(
    object: &str,
    attribute: &'static str,
    array: &DataArray,
    expected: DataType,
    lookup: &dyn ObjectLookup,
) -> Result<Vec<PrimHandle>, CommitError> {
    let type_error = || CommitError::ReferenceType {
        object: object.to_string(),
        attribute,
        expected,
        actual: array.element_type(),
    };
    if array.element_type() != expected {
        return Err(type_error());
    }
    let handles = array.handles().ok_or_else(type_error)?;

    handles
        .iter()
        .enumerate()
        .map(|(index, &target)| match lookup.lookup(target) {
            Some(ResolvedObject {
                data_type,
                prim: Some(prim),
            }) if data_type == expected => Ok(prim),
            Some(ResolvedObject {
                data_type,
                prim: None,
            }) if data_type == expected => Err(CommitError::UncommittedReference {
                object: object.to_string(),
                attribute,
                index,
                target,
            }),
            _ => Err(CommitError::InvalidReference {
                object: object.to_string(),
                attribute,
                index,
                target,
                expected,
            }),
        })
        .collect()
}

/// How a container's reference list was updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefUpdate {
    /// Replaced with this many references.
    Replaced(usize),
    Cleared,
}

/// Replace the container's instance references with `refs`, or clear them
/// explicitly when `refs` is empty.
pub fn push_references(
    bridge: &dyn SceneBridge,
    container: PrimHandle,
    refs: &[PrimHandle],
    time_varying: bool,
    time: TimeCode,
) -> BridgeResult<RefUpdate> {
    if refs.is_empty() {
        bridge.delete_instance_refs(container, time_varying, time)?;
        debug!(%container, time_varying, %time, "cleared references");
        Ok(RefUpdate::Cleared)
    } else {
        bridge.set_instance_refs(container, refs, time_varying, time)?;
        debug!(%container, count = refs.len(), time_varying, %time, "replaced references");
        Ok(RefUpdate::Replaced(refs.len()))
    }
}
