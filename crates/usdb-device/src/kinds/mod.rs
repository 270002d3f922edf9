//! Per-kind commit strategies.
//!
//! Each object kind supplies a static attribute schema and a
//! [`KindStrategy`] implementation. The generic commit protocol in
//! [`crate::commit`] drives the strategy; strategies never touch the parameter
//! table or the prim handle themselves.

pub mod instance;
pub mod sampler;
pub mod spatial_field;
pub mod world;

use usdb_bridge::{BridgeResult, SceneBridge};
use usdb_params::ParamSchema;
use usdb_types::{PrimHandle, TimeCode};

use crate::config::DeviceConfig;
use crate::error::CommitError;
use crate::object::ObjectKind;
use crate::resolver::ObjectLookup;

pub use instance::{InstanceKind, InstanceParams, INSTANCE_SCHEMA};
pub use sampler::{SamplerKind, SamplerParams, SAMPLER_SCHEMA};
pub use spatial_field::{SpatialFieldKind, SpatialFieldParams, SPATIAL_FIELD_SCHEMA};
pub use world::{WorldKind, WorldParams, WORLD_SCHEMA};

/// Everything a commit can see beyond the committing object.
pub struct CommitContext<'a> {
    /// `None` when the device runs without a backing document.
    pub bridge: Option<&'a dyn SceneBridge>,
    pub config: &'a DeviceConfig,
    /// Other live objects, for reference resolution.
    pub lookup: &'a dyn ObjectLookup,
}

/// A validated attribute bundle together with the time code it is written at.
#[derive(Clone, Debug, PartialEq)]
pub struct Staged<T> {
    pub data: T,
    pub time: TimeCode,
}

/// Kind-specific half of the commit protocol.
pub trait KindStrategy: Sized + 'static {
    /// Typed attribute storage.
    type Params: Default + Send + Sync + 'static;
    /// What validation produces and the write step consumes.
    type Bundle;

    const KIND: ObjectKind;

    fn schema() -> &'static ParamSchema<Self::Params>;

    /// Check required attributes and build the bundle. Runs before the prim
    /// is created, so a failure leaves nothing behind in the document.
    fn validate(
        object: &str,
        params: &Self::Params,
        ctx: &CommitContext<'_>,
    ) -> Result<Self::Bundle, CommitError>;

    /// Push a validated bundle to the bridge.
    fn write(bridge: &dyn SceneBridge, prim: PrimHandle, bundle: &Self::Bundle) -> BridgeResult<()>;

    /// Side effect run at the end of every commit that was not aborted,
    /// whether or not anything was written.
    fn after_commit(_bridge: &dyn SceneBridge, _ctx: &CommitContext<'_>) -> BridgeResult<()> {
        Ok(())
    }

    /// Remove the persisted counterpart of a released object.
    fn release(
        bridge: &dyn SceneBridge,
        prim: PrimHandle,
        _params: &Self::Params,
        _ctx: &CommitContext<'_>,
    ) -> BridgeResult<()> {
        bridge.delete_prim(prim).map(|_| ())
    }
}

/// Convert a time step attribute into a time code.
pub(crate) fn time_code(object: &str, value: f64) -> Result<TimeCode, CommitError> {
    TimeCode::new(value).map_err(|_| CommitError::InvalidTimeStep {
        object: object.to_string(),
        value,
    })
}
