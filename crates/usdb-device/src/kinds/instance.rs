use usdb_bridge::{BridgeResult, InstanceData, SceneBridge};
use usdb_params::{ParamDecl, ParamSchema, Slot};
use usdb_types::{DataType, PrimHandle};

use super::{time_code, CommitContext, KindStrategy, Staged};
use crate::error::CommitError;
use crate::object::ObjectKind;

pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

#[derive(Debug)]
pub struct InstanceParams {
    pub time_step: f64,
    pub time_varying: i32,
    pub transform: [f32; 16],
}

impl Default for InstanceParams {
    fn default() -> Self {
        Self {
            time_step: 0.0,
            time_varying: 0,
            transform: IDENTITY,
        }
    }
}

pub static INSTANCE_SCHEMA: ParamSchema<InstanceParams> = ParamSchema {
    kind: "instance",
    decls: &[
        ParamDecl {
            name: "usd::timestep",
            ty: DataType::Float64,
            slot: |p| Slot::Float64(&mut p.time_step),
        },
        ParamDecl {
            name: "usd::timevarying",
            ty: DataType::Int32,
            slot: |p| Slot::Int32(&mut p.time_varying),
        },
        ParamDecl {
            name: "transform",
            ty: DataType::Float32Mat4,
            slot: |p| Slot::Float32Mat4(&mut p.transform),
        },
    ],
};

/// Placed copies of a group, referenced from worlds.
#[derive(Debug)]
pub struct InstanceKind;

impl KindStrategy for InstanceKind {
    type Params = InstanceParams;
    type Bundle = Staged<InstanceData>;

    const KIND: ObjectKind = ObjectKind::Instance;

    fn schema() -> &'static ParamSchema<InstanceParams> {
        &INSTANCE_SCHEMA
    }

    fn validate(
        object: &str,
        params: &InstanceParams,
        _ctx: &CommitContext<'_>,
    ) -> Result<Self::Bundle, CommitError> {
        Ok(Staged {
            data: InstanceData {
                transform: params.transform,
                time_varying: params.time_varying as u32,
            },
            time: time_code(object, params.time_step)?,
        })
    }

    fn write(bridge: &dyn SceneBridge, prim: PrimHandle, bundle: &Self::Bundle) -> BridgeResult<()> {
        bridge.set_instance_data(prim, &bundle.data, bundle.time)
    }
}
