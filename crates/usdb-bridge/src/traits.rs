use usdb_types::{PrimHandle, TimeCode};

use crate::error::BridgeResult;
use crate::log::BridgeLogEntry;
use crate::prim::{CreatedPrim, InstanceData, PrimKind, SamplerData, SpatialFieldData};

/// Persistence collaborator of the commit engine.
///
/// All implementations must satisfy these invariants:
/// - Calls are synchronous; when a call returns, its effect is visible to
///   every later call.
/// - `create_prim` is idempotent by path. The returned handle stays valid
///   until `delete_prim` is called on it.
/// - Data writes replace whole bundles. Members flagged in the bundle's
///   time-varying mask are recorded at `time`; all others replace the
///   default value.
/// - Reference lists are replaced or cleared wholesale. A set call is never
///   made with an empty list; callers clear instead.
pub trait SceneBridge: Send + Sync {
    /// Create the prim `name` of `kind`, or return the existing one.
    fn create_prim(&self, kind: PrimKind, name: &str) -> BridgeResult<CreatedPrim>;

    /// Delete a prim. Returns `true` if it existed.
    fn delete_prim(&self, handle: PrimHandle) -> BridgeResult<bool>;

    /// Write a sampler's attribute bundle.
    fn set_sampler_data(
        &self,
        handle: PrimHandle,
        data: &SamplerData,
        time: TimeCode,
    ) -> BridgeResult<()>;

    /// Write a spatial field's attribute bundle.
    fn set_spatial_field_data(
        &self,
        handle: PrimHandle,
        data: &SpatialFieldData,
        time: TimeCode,
    ) -> BridgeResult<()>;

    /// Write an instance's attribute bundle.
    fn set_instance_data(
        &self,
        handle: PrimHandle,
        data: &InstanceData,
        time: TimeCode,
    ) -> BridgeResult<()>;

    /// Replace a world's instance reference list, preserving order.
    fn set_instance_refs(
        &self,
        world: PrimHandle,
        instances: &[PrimHandle],
        time_varying: bool,
        time: TimeCode,
    ) -> BridgeResult<()>;

    /// Clear a world's instance reference list.
    fn delete_instance_refs(
        &self,
        world: PrimHandle,
        time_varying: bool,
        time: TimeCode,
    ) -> BridgeResult<()>;

    /// Persist the whole document.
    fn save_scene(&self) -> BridgeResult<()>;

    /// Drain diagnostics queued by the bridge since the last call.
    ///
    /// Default implementation queues nothing.
    fn take_log(&self) -> Vec<BridgeLogEntry> {
        Vec::new()
    }
}
