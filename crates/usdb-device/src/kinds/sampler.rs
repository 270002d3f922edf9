use usdb_bridge::{BridgeResult, SamplerData, SceneBridge, WrapMode};
use usdb_params::{ParamDecl, ParamSchema, Slot};
use usdb_types::{DataType, PrimHandle};

use super::{time_code, CommitContext, KindStrategy, Staged};
use crate::error::CommitError;
use crate::object::ObjectKind;

#[derive(Debug, Default)]
pub struct SamplerParams {
    pub time_step: f64,
    pub time_varying: i32,
    pub file_name: Option<String>,
    pub wrap_s: Option<String>,
    pub wrap_t: Option<String>,
}

pub static SAMPLER_SCHEMA: ParamSchema<SamplerParams> = ParamSchema {
    kind: "sampler",
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
            name: "filename",
            ty: DataType::String,
            slot: |p| Slot::Str(&mut p.file_name),
        },
        ParamDecl {
            name: "wrapMode1",
            ty: DataType::String,
            slot: |p| Slot::Str(&mut p.wrap_s),
        },
        ParamDecl {
            name: "wrapMode2",
            ty: DataType::String,
            slot: |p| Slot::Str(&mut p.wrap_t),
        },
    ],
};

/// Map a caller wrap mode name. Unrecognized or absent names wrap to black.
pub fn wrap_mode(name: Option<&str>) -> WrapMode {
    match name {
        Some("clampToEdge") => WrapMode::Clamp,
        Some("repeat") => WrapMode::Repeat,
        Some("mirrorRepeat") => WrapMode::Mirror,
        _ => WrapMode::Black,
    }
}

/// Texture samplers. No attribute is required.
#[derive(Debug)]
pub struct SamplerKind;

impl KindStrategy for SamplerKind {
    type Params = SamplerParams;
    type Bundle = Staged<SamplerData>;

    const KIND: ObjectKind = ObjectKind::Sampler;

    fn schema() -> &'static ParamSchema<SamplerParams> {
        &SAMPLER_SCHEMA
    }

    fn validate(
        object: &str,
        params: &SamplerParams,
        _ctx: &CommitContext<'_>,
    ) -> Result<Self::Bundle, CommitError> {
        Ok(Staged {
            data: SamplerData {
                file_name: params.file_name.clone(),
                wrap_s: wrap_mode(params.wrap_s.as_deref()),
                wrap_t: wrap_mode(params.wrap_t.as_deref()),
                time_varying: params.time_varying as u32,
            },
            time: time_code(object, params.time_step)?,
        })
    }

    fn write(bridge: &dyn SceneBridge, prim: PrimHandle, bundle: &Self::Bundle) -> BridgeResult<()> {
        bridge.set_sampler_data(prim, &bundle.data, bundle.time)
    }
}
