use std::sync::Arc;

use tracing::debug;
use usdb_bridge::{BridgeResult, SceneBridge};
use usdb_params::{DataArray, ParamDecl, ParamSchema, Slot};
use usdb_types::{DataType, PrimHandle, TimeCode};

use super::{time_code, CommitContext, KindStrategy, Staged};
use crate::config::SavePolicy;
use crate::error::CommitError;
use crate::object::ObjectKind;
use crate::resolver::{push_references, resolve_references};

pub const INSTANCE_PARAM: &str = "instance";

#[derive(Debug, Default)]
pub struct WorldParams {
    pub time_varying: i32,
    pub instances: Option<Arc<DataArray>>,
}

pub static WORLD_SCHEMA: ParamSchema<WorldParams> = ParamSchema {
    kind: "world",
    decls: &[
        ParamDecl {
            name: "usd::timevarying",
            ty: DataType::Int32,
            slot: |p| Slot::Int32(&mut p.time_varying),
        },
        ParamDecl {
            name: INSTANCE_PARAM,
            ty: DataType::Array,
            slot: |p| Slot::Array(&mut p.instances),
        },
    ],
};

/// Resolved instance reference list of a world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldRefs {
    pub instances: Vec<PrimHandle>,
    pub time_varying: bool,
}

/// Scene roots. A world's only attribute is its instance list, written at the
/// device time step. Every world commit that is not aborted saves the scene
/// under [`SavePolicy::EveryWorldCommit`].
#[derive(Debug)]
pub struct WorldKind;

impl KindStrategy for WorldKind {
    type Params = WorldParams;
    type Bundle = Staged<WorldRefs>;

    const KIND: ObjectKind = ObjectKind::World;

    fn schema() -> &'static ParamSchema<WorldParams> {
        &WORLD_SCHEMA
    }

    fn validate(
        object: &str,
        params: &WorldParams,
        ctx: &CommitContext<'_>,
    ) -> Result<Self::Bundle, CommitError> {
        let instances = match &params.instances {
            Some(array) => resolve_references(
                object,
                INSTANCE_PARAM,
                array,
                DataType::Instance,
                ctx.lookup,
            )?,
            None => Vec::new(),
        };
        Ok(Staged {
            data: WorldRefs {
                instances,
                time_varying: params.time_varying != 0,
            },
            time: time_code(object, ctx.config.time_step)?,
        })
    }

    fn write(bridge: &dyn SceneBridge, prim: PrimHandle, bundle: &Self::Bundle) -> BridgeResult<()> {
        push_references(
            bridge,
            prim,
            &bundle.data.instances,
            bundle.data.time_varying,
            bundle.time,
        )
        .map(|_| ())
    }

    fn after_commit(bridge: &dyn SceneBridge, ctx: &CommitContext<'_>) -> BridgeResult<()> {
        match ctx.config.save_policy {
            SavePolicy::EveryWorldCommit => {
                debug!("saving scene after world commit");
                bridge.save_scene()
            }
            SavePolicy::Explicit => Ok(()),
        }
    }

    fn release(
        bridge: &dyn SceneBridge,
        prim: PrimHandle,
        params: &WorldParams,
        ctx: &CommitContext<'_>,
    ) -> BridgeResult<()> {
        let time = TimeCode::new(ctx.config.time_step).unwrap_or_default();
        bridge.delete_instance_refs(prim, params.time_varying != 0, time)?;
        bridge.delete_prim(prim).map(|_| ())
    }
}
