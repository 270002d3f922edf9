//! Prim kinds and the typed attribute bundles written to them.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use usdb_types::{DocumentType, PrimHandle};

/// Kind of a prim in the scene document. Fixes the scope the prim lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimKind {
    Sampler,
    SpatialField,
    Instance,
    World,
}

impl PrimKind {
    /// Top-level scope under which prims of this kind are placed.
    pub fn scope(self) -> &'static str {
        match self {
            PrimKind::Sampler => "samplers",
            PrimKind::SpatialField => "fields",
            PrimKind::Instance => "instances",
            PrimKind::World => "worlds",
        }
    }

    /// Full document path of a prim of this kind named `name`.
    pub fn path_for(self, name: &str) -> String {
        format!("/{}/{}", self.scope(), name)
    }
}

impl fmt::Display for PrimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimKind::Sampler => "sampler",
            PrimKind::SpatialField => "spatial field",
            PrimKind::Instance => "instance",
            PrimKind::World => "world",
        };
        f.write_str(s)
    }
}

/// Result of a create request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatedPrim {
    pub handle: PrimHandle,
    /// `false` when a prim already existed at the requested path.
    pub is_new: bool,
}

/// Texture coordinate wrapping of a sampler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Black,
    Clamp,
    Repeat,
    Mirror,
}

impl WrapMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WrapMode::Black => "black",
            WrapMode::Clamp => "clamp",
            WrapMode::Repeat => "repeat",
            WrapMode::Mirror => "mirror",
        }
    }
}

/// One member of an attribute bundle, as persisted.
///
/// `bit` is the member's flag in the bundle's time-varying mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub name: &'static str,
    pub bit: u32,
    pub value: Value,
}

impl Member {
    fn new(name: &'static str, bit: u32, value: Value) -> Self {
        Self { name, bit, value }
    }
}

/// Attribute bundle of a sampler prim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SamplerData {
    pub file_name: Option<String>,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub time_varying: u32,
}

impl SamplerData {
    pub const FILE_NAME: u32 = 1;
    pub const WRAP_S: u32 = 1 << 1;
    pub const WRAP_T: u32 = 1 << 2;
}

/// Attribute bundle of a spatial field prim.
///
/// `data` holds `num_items` little-endian scalars of `element_type`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialFieldData {
    pub element_type: DocumentType,
    pub data: Bytes,
    pub num_items: u64,
    pub spacing: [f32; 3],
    pub origin: [f32; 3],
    pub time_varying: u32,
}

impl SpatialFieldData {
    pub const DATA: u32 = 1;
}

/// Attribute bundle of an instance prim.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceData {
    /// Column-major 4x4 transform.
    pub transform: [f32; 16],
    pub time_varying: u32,
}

impl InstanceData {
    pub const TRANSFORM: u32 = 1;
}

/// Any attribute bundle, tagged with the prim kind it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub enum PrimData {
    Sampler(SamplerData),
    SpatialField(SpatialFieldData),
    Instance(InstanceData),
}

impl PrimData {
    /// Kind of prim this bundle is written to.
    pub fn kind(&self) -> PrimKind {
        match self {
            PrimData::Sampler(_) => PrimKind::Sampler,
            PrimData::SpatialField(_) => PrimKind::SpatialField,
            PrimData::Instance(_) => PrimKind::Instance,
        }
    }

    /// The bundle's time-varying mask.
    pub fn time_varying(&self) -> u32 {
        match self {
            PrimData::Sampler(d) => d.time_varying,
            PrimData::SpatialField(d) => d.time_varying,
            PrimData::Instance(d) => d.time_varying,
        }
    }

    /// Decompose the bundle into persisted members.
    ///
    /// Members without a time-varying flag use bit `0` and are always
    /// written to the default value.
    pub fn members(&self) -> Vec<Member> {
        match self {
            PrimData::Sampler(d) => vec![
                Member::new("fileName", SamplerData::FILE_NAME, json!(d.file_name)),
                Member::new("wrapS", SamplerData::WRAP_S, json!(d.wrap_s.as_str())),
                Member::new("wrapT", SamplerData::WRAP_T, json!(d.wrap_t.as_str())),
            ],
            PrimData::SpatialField(d) => vec![
                Member::new(
                    "data",
                    SpatialFieldData::DATA,
                    json!({
                        "type": d.element_type.to_string(),
                        "count": d.num_items,
                        "bytes": d.data.len(),
                    }),
                ),
                Member::new("spacing", 0, json!(d.spacing)),
                Member::new("origin", 0, json!(d.origin)),
            ],
            PrimData::Instance(d) => vec![Member::new(
                "transform",
                InstanceData::TRANSFORM,
                json!(d.transform),
            )],
        }
    }
}
