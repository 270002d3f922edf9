use std::sync::Arc;

use usdb_bridge::{BridgeResult, SceneBridge, SpatialFieldData};
use usdb_params::{assert_dense, assert_one_dimensional, DataArray, ParamDecl, ParamSchema, Slot};
use usdb_types::{DataType, PrimHandle};

use super::{time_code, CommitContext, KindStrategy, Staged};
use crate::error::CommitError;
use crate::object::ObjectKind;

pub const DATA_PARAM: &str = "data";

#[derive(Debug)]
pub struct SpatialFieldParams {
    pub time_step: f64,
    pub time_varying: i32,
    pub data: Option<Arc<DataArray>>,
    pub spacing: [f32; 3],
    pub origin: [f32; 3],
}

impl Default for SpatialFieldParams {
    fn default() -> Self {
        Self {
            time_step: 0.0,
            time_varying: 0,
            data: None,
            spacing: [1.0; 3],
            origin: [0.0; 3],
        }
    }
}

pub static SPATIAL_FIELD_SCHEMA: ParamSchema<SpatialFieldParams> = ParamSchema {
    kind: "spatial_field",
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
            name: DATA_PARAM,
            ty: DataType::Array,
            slot: |p| Slot::Array(&mut p.data),
        },
        ParamDecl {
            name: "spacing",
            ty: DataType::Float32Vec3,
            slot: |p| Slot::Float32Vec3(&mut p.spacing),
        },
        ParamDecl {
            name: "origin",
            ty: DataType::Float32Vec3,
            slot: |p| Slot::Float32Vec3(&mut p.origin),
        },
    ],
};

/// Structured volume data. Requires a dense 1-D `data` array of numeric
/// scalars.
#[derive(Debug)]
pub struct SpatialFieldKind;

impl KindStrategy for SpatialFieldKind {
    type Params = SpatialFieldParams;
    type Bundle = Staged<SpatialFieldData>;

    const KIND: ObjectKind = ObjectKind::SpatialField;

    fn schema() -> &'static ParamSchema<SpatialFieldParams> {
        &SPATIAL_FIELD_SCHEMA
    }

    fn validate(
        object: &str,
        params: &SpatialFieldParams,
        _ctx: &CommitContext<'_>,
    ) -> Result<Self::Bundle, CommitError> {
        let array = params.data.as_ref().ok_or_else(|| CommitError::MissingAttribute {
            object: object.to_string(),
            attribute: DATA_PARAM,
        })?;

        assert_one_dimensional(array.layout(), object, DATA_PARAM)?;
        assert_dense(array.layout(), object, DATA_PARAM)?;

        let incompatible = || CommitError::IncompatibleElementType {
            object: object.to_string(),
            attribute: DATA_PARAM,
            actual: array.element_type(),
        };
        if !array.element_type().is_numeric_scalar() {
            return Err(incompatible());
        }
        let bytes = array.bytes().ok_or_else(incompatible)?;

        Ok(Staged {
            data: SpatialFieldData {
                element_type: array.element_type().to_document_type_flattened(),
                data: bytes.clone(),
                num_items: array.layout().total_items(),
                spacing: params.spacing,
                origin: params.origin,
                time_varying: params.time_varying as u32,
            },
            time: time_code(object, params.time_step)?,
        })
    }

    fn write(bridge: &dyn SceneBridge, prim: PrimHandle, bundle: &Self::Bundle) -> BridgeResult<()> {
        bridge.set_spatial_field_data(prim, &bundle.data, bundle.time)
    }
}
