use std::fmt;
use std::mem::size_of;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Display name returned for tags that have no stable literal.
pub const UNKNOWN_TYPE_NAME: &str = "Unknown type";

/// Prefix shared by all stable data type names.
const NAME_PREFIX: &str = "ANARI_";

/// Declares the [`DataType`] enum together with its stable display names and
/// the [`DataType::ALL`] table. `Unknown` is added separately: it has no
/// stable name and is never part of the enumerated set.
macro_rules! data_types {
    ($($(#[$meta:meta])* $variant:ident => $name:literal,)*) => {
        /// Caller-side type tag of an attribute value.
        ///
        /// Covers numeric scalars and vectors, fixed-point and sRGB formats,
        /// boxes, matrices, strings, callbacks, and every kind of object
        /// handle.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum DataType {
            /// Tag outside the enumerated set.
            Unknown,
            $($(#[$meta])* $variant,)*
        }

        impl DataType {
            /// Every enumerated tag, in declaration order. Excludes `Unknown`.
            pub const ALL: &'static [DataType] = &[$(DataType::$variant,)*];

            /// Stable human-readable name, for diagnostics only.
            pub fn name(self) -> &'static str {
                match self {
                    DataType::Unknown => UNKNOWN_TYPE_NAME,
                    $(DataType::$variant => $name,)*
                }
            }
        }
    };
}

data_types! {
    // Meta and callback types.
    DataType => "ANARI_DATA_TYPE",
    VoidPointer => "ANARI_VOID_POINTER",
    String => "ANARI_STRING",
    FunctionPointer => "ANARI_FUNCTION_POINTER",
    MemoryDeleter => "ANARI_MEMORY_DELETER",
    StatusCallback => "ANARI_STATUS_CALLBACK",
    FrameCompletionCallback => "ANARI_FRAME_COMPLETION_CALLBACK",
    Library => "ANARI_LIBRARY",
    Device => "ANARI_DEVICE",

    // Object handles.
    Object => "ANARI_OBJECT",
    Array => "ANARI_ARRAY",
    Array1D => "ANARI_ARRAY1D",
    Array2D => "ANARI_ARRAY2D",
    Array3D => "ANARI_ARRAY3D",
    Camera => "ANARI_CAMERA",
    Frame => "ANARI_FRAME",
    Geometry => "ANARI_GEOMETRY",
    Group => "ANARI_GROUP",
    Instance => "ANARI_INSTANCE",
    Light => "ANARI_LIGHT",
    Material => "ANARI_MATERIAL",
    Renderer => "ANARI_RENDERER",
    Surface => "ANARI_SURFACE",
    Sampler => "ANARI_SAMPLER",
    SpatialField => "ANARI_SPATIAL_FIELD",
    Volume => "ANARI_VOLUME",
    World => "ANARI_WORLD",

    // Integers and floats.
    Int8 => "ANARI_INT8",
    Int8Vec2 => "ANARI_INT8_VEC2",
    Int8Vec3 => "ANARI_INT8_VEC3",
    Int8Vec4 => "ANARI_INT8_VEC4",
    UInt8 => "ANARI_UINT8",
    UInt8Vec2 => "ANARI_UINT8_VEC2",
    UInt8Vec3 => "ANARI_UINT8_VEC3",
    UInt8Vec4 => "ANARI_UINT8_VEC4",
    Int16 => "ANARI_INT16",
    Int16Vec2 => "ANARI_INT16_VEC2",
    Int16Vec3 => "ANARI_INT16_VEC3",
    Int16Vec4 => "ANARI_INT16_VEC4",
    UInt16 => "ANARI_UINT16",
    UInt16Vec2 => "ANARI_UINT16_VEC2",
    UInt16Vec3 => "ANARI_UINT16_VEC3",
    UInt16Vec4 => "ANARI_UINT16_VEC4",
    Int32 => "ANARI_INT32",
    Int32Vec2 => "ANARI_INT32_VEC2",
    Int32Vec3 => "ANARI_INT32_VEC3",
    Int32Vec4 => "ANARI_INT32_VEC4",
    UInt32 => "ANARI_UINT32",
    UInt32Vec2 => "ANARI_UINT32_VEC2",
    UInt32Vec3 => "ANARI_UINT32_VEC3",
    UInt32Vec4 => "ANARI_UINT32_VEC4",
    Bool => "ANARI_BOOL",
    Int64 => "ANARI_INT64",
    Int64Vec2 => "ANARI_INT64_VEC2",
    Int64Vec3 => "ANARI_INT64_VEC3",
    Int64Vec4 => "ANARI_INT64_VEC4",
    UInt64 => "ANARI_UINT64",
    UInt64Vec2 => "ANARI_UINT64_VEC2",
    UInt64Vec3 => "ANARI_UINT64_VEC3",
    UInt64Vec4 => "ANARI_UINT64_VEC4",
    Float32 => "ANARI_FLOAT32",
    Float32Vec2 => "ANARI_FLOAT32_VEC2",
    Float32Vec3 => "ANARI_FLOAT32_VEC3",
    Float32Vec4 => "ANARI_FLOAT32_VEC4",
    Float64 => "ANARI_FLOAT64",
    Float64Vec2 => "ANARI_FLOAT64_VEC2",
    Float64Vec3 => "ANARI_FLOAT64_VEC3",
    Float64Vec4 => "ANARI_FLOAT64_VEC4",

    // Boxes, matrices, quaternions.
    Int32Box1 => "ANARI_INT32_BOX1",
    Int32Box2 => "ANARI_INT32_BOX2",
    Int32Box3 => "ANARI_INT32_BOX3",
    Int32Box4 => "ANARI_INT32_BOX4",
    Float32Box1 => "ANARI_FLOAT32_BOX1",
    Float32Box2 => "ANARI_FLOAT32_BOX2",
    Float32Box3 => "ANARI_FLOAT32_BOX3",
    Float32Box4 => "ANARI_FLOAT32_BOX4",
    Float32Mat2 => "ANARI_FLOAT32_MAT2",
    Float32Mat3 => "ANARI_FLOAT32_MAT3",
    Float32Mat4 => "ANARI_FLOAT32_MAT4",
    Float32Mat2x3 => "ANARI_FLOAT32_MAT2x3",
    Float32Mat3x4 => "ANARI_FLOAT32_MAT3x4",
    Float32QuatIjkw => "ANARI_FLOAT32_QUAT_IJKW",

    // Normalized fixed-point formats.
    Fixed8 => "ANARI_FIXED8",
    Fixed8Vec2 => "ANARI_FIXED8_VEC2",
    Fixed8Vec3 => "ANARI_FIXED8_VEC3",
    Fixed8Vec4 => "ANARI_FIXED8_VEC4",
    UFixed8 => "ANARI_UFIXED8",
    UFixed8Vec2 => "ANARI_UFIXED8_VEC2",
    UFixed8Vec3 => "ANARI_UFIXED8_VEC3",
    UFixed8Vec4 => "ANARI_UFIXED8_VEC4",
    Fixed16 => "ANARI_FIXED16",
    Fixed16Vec2 => "ANARI_FIXED16_VEC2",
    Fixed16Vec3 => "ANARI_FIXED16_VEC3",
    Fixed16Vec4 => "ANARI_FIXED16_VEC4",
    UFixed16 => "ANARI_UFIXED16",
    UFixed16Vec2 => "ANARI_UFIXED16_VEC2",
    UFixed16Vec3 => "ANARI_UFIXED16_VEC3",
    UFixed16Vec4 => "ANARI_UFIXED16_VEC4",
    Fixed32 => "ANARI_FIXED32",
    Fixed32Vec2 => "ANARI_FIXED32_VEC2",
    Fixed32Vec3 => "ANARI_FIXED32_VEC3",
    Fixed32Vec4 => "ANARI_FIXED32_VEC4",
    UFixed32 => "ANARI_UFIXED32",
    UFixed32Vec2 => "ANARI_UFIXED32_VEC2",
    UFixed32Vec3 => "ANARI_UFIXED32_VEC3",
    UFixed32Vec4 => "ANARI_UFIXED32_VEC4",
    Fixed64 => "ANARI_FIXED64",
    Fixed64Vec2 => "ANARI_FIXED64_VEC2",
    Fixed64Vec3 => "ANARI_FIXED64_VEC3",
    Fixed64Vec4 => "ANARI_FIXED64_VEC4",
    UFixed64 => "ANARI_UFIXED64",
    UFixed64Vec2 => "ANARI_UFIXED64_VEC2",
    UFixed64Vec3 => "ANARI_UFIXED64_VEC3",
    UFixed64Vec4 => "ANARI_UFIXED64_VEC4",
    UFixed8RSrgb => "ANARI_UFIXED8_R_SRGB",
    UFixed8RaSrgb => "ANARI_UFIXED8_RA_SRGB",
    UFixed8RgbSrgb => "ANARI_UFIXED8_RGB_SRGB",
    UFixed8RgbaSrgb => "ANARI_UFIXED8_RGBA_SRGB",
}

impl DataType {
    /// Look up a tag by its stable name. The `ANARI_` prefix is optional and
    /// matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix(NAME_PREFIX).unwrap_or(name);
        Self::ALL
            .iter()
            .copied()
            .find(|ty| &ty.name()[NAME_PREFIX.len()..] == bare)
    }

    /// Returns `true` for handles to scene objects and arrays of any rank.
    pub fn is_object(self) -> bool {
        matches!(
            self,
            DataType::Object
                | DataType::Array
                | DataType::Array1D
                | DataType::Array2D
                | DataType::Array3D
                | DataType::Camera
                | DataType::Frame
                | DataType::Geometry
                | DataType::Group
                | DataType::Instance
                | DataType::Light
                | DataType::Material
                | DataType::Renderer
                | DataType::Surface
                | DataType::Sampler
                | DataType::SpatialField
                | DataType::Volume
                | DataType::World
        )
    }

    /// Returns `true` for array handles of any rank.
    pub fn is_array(self) -> bool {
        matches!(
            self,
            DataType::Array | DataType::Array1D | DataType::Array2D | DataType::Array3D
        )
    }

    /// Returns `true` for integer and float scalars of 8 to 64 bits.
    pub fn is_numeric_scalar(self) -> bool {
        matches!(self.numeric_parts(), Some((_, 1)))
    }

    /// Returns `true` for integer and float scalars and their 2-4 component
    /// vectors.
    pub fn is_numeric(self) -> bool {
        self.numeric_parts().is_some()
    }

    /// The 1-component tag of a numeric scalar or vector family.
    pub fn scalar(self) -> Option<DataType> {
        self.numeric_parts().map(|(scalar, _)| scalar)
    }

    /// Component count of a numeric scalar or vector.
    pub fn components(self) -> Option<usize> {
        self.numeric_parts().map(|(_, n)| n)
    }

    /// Element tag and element count of any value-like tag: numeric and
    /// fixed-point vectors, sRGB formats, boxes, matrices, quaternions, and
    /// booleans. `None` for strings, callbacks, and handles.
    pub fn value_shape(self) -> Option<(DataType, usize)> {
        use crate::data_type::DataType::*;
        if let Some(parts) = self.numeric_parts() {
            return Some(parts);
        }
        let shape = match self {
            Bool => (Bool, 1),
            Fixed8 => (Fixed8, 1),
            Fixed8Vec2 => (Fixed8, 2),
            Fixed8Vec3 => (Fixed8, 3),
            Fixed8Vec4 => (Fixed8, 4),
            UFixed8 | UFixed8RSrgb => (UFixed8, 1),
            UFixed8Vec2 | UFixed8RaSrgb => (UFixed8, 2),
            UFixed8Vec3 | UFixed8RgbSrgb => (UFixed8, 3),
            UFixed8Vec4 | UFixed8RgbaSrgb => (UFixed8, 4),
            Fixed16 => (Fixed16, 1),
            Fixed16Vec2 => (Fixed16, 2),
            Fixed16Vec3 => (Fixed16, 3),
            Fixed16Vec4 => (Fixed16, 4),
            UFixed16 => (UFixed16, 1),
            UFixed16Vec2 => (UFixed16, 2),
            UFixed16Vec3 => (UFixed16, 3),
            UFixed16Vec4 => (UFixed16, 4),
            Fixed32 => (Fixed32, 1),
            Fixed32Vec2 => (Fixed32, 2),
            Fixed32Vec3 => (Fixed32, 3),
            Fixed32Vec4 => (Fixed32, 4),
            UFixed32 => (UFixed32, 1),
            UFixed32Vec2 => (UFixed32, 2),
            UFixed32Vec3 => (UFixed32, 3),
            UFixed32Vec4 => (UFixed32, 4),
            Fixed64 => (Fixed64, 1),
            Fixed64Vec2 => (Fixed64, 2),
            Fixed64Vec3 => (Fixed64, 3),
            Fixed64Vec4 => (Fixed64, 4),
            UFixed64 => (UFixed64, 1),
            UFixed64Vec2 => (UFixed64, 2),
            UFixed64Vec3 => (UFixed64, 3),
            UFixed64Vec4 => (UFixed64, 4),
            Int32Box1 => (Int32, 2),
            Int32Box2 => (Int32, 4),
            Int32Box3 => (Int32, 6),
            Int32Box4 => (Int32, 8),
            Float32Box1 => (Float32, 2),
            Float32Box2 => (Float32, 4),
            Float32Box3 => (Float32, 6),
            Float32Box4 => (Float32, 8),
            Float32Mat2 => (Float32, 4),
            Float32Mat3 => (Float32, 9),
            Float32Mat4 => (Float32, 16),
            Float32Mat2x3 => (Float32, 6),
            Float32Mat3x4 => (Float32, 12),
            Float32QuatIjkw => (Float32, 4),
            _ => return None,
        };
        Some(shape)
    }

    /// Byte size of one value of this type.
    ///
    /// All object-like tags are normalized to [`DataType::Object`] first, so
    /// every handle kind has pointer width. `Unknown` has no size; asking for
    /// it is a contract violation that asserts in debug builds and yields 0
    /// otherwise.
    pub fn size_of(self) -> usize {
        use crate::data_type::DataType::*;
        let ty = if self.is_object() { Object } else { self };
        match ty {
            DataType => size_of::<i32>(),
            String => size_of::<*const u8>(),
            FunctionPointer | MemoryDeleter | StatusCallback | FrameCompletionCallback => {
                size_of::<fn()>()
            }
            VoidPointer | Device | Library | Object => size_of::<*const ()>(),
            Int8 | UInt8 | Fixed8 | UFixed8 | UFixed8RSrgb => 1,
            Int8Vec2 | UInt8Vec2 | Fixed8Vec2 | UFixed8Vec2 | UFixed8RaSrgb => 2,
            Int8Vec3 | UInt8Vec3 | Fixed8Vec3 | UFixed8Vec3 | UFixed8RgbSrgb => 3,
            Int8Vec4 | UInt8Vec4 | Fixed8Vec4 | UFixed8Vec4 | UFixed8RgbaSrgb => 4,
            Int16 | UInt16 | Fixed16 | UFixed16 => 2,
            Int16Vec2 | UInt16Vec2 | Fixed16Vec2 | UFixed16Vec2 => 2 * 2,
            Int16Vec3 | UInt16Vec3 | Fixed16Vec3 | UFixed16Vec3 => 3 * 2,
            Int16Vec4 | UInt16Vec4 | Fixed16Vec4 | UFixed16Vec4 => 4 * 2,
            Int32 | UInt32 | Fixed32 | UFixed32 | Bool => 4,
            Int32Vec2 | UInt32Vec2 | Fixed32Vec2 | UFixed32Vec2 => 2 * 4,
            Int32Vec3 | UInt32Vec3 | Fixed32Vec3 | UFixed32Vec3 => 3 * 4,
            Int32Vec4 | UInt32Vec4 | Fixed32Vec4 | UFixed32Vec4 => 4 * 4,
            Int64 | UInt64 | Fixed64 | UFixed64 => 8,
            Int64Vec2 | UInt64Vec2 | Fixed64Vec2 | UFixed64Vec2 => 2 * 8,
            Int64Vec3 | UInt64Vec3 | Fixed64Vec3 | UFixed64Vec3 => 3 * 8,
            Int64Vec4 | UInt64Vec4 | Fixed64Vec4 | UFixed64Vec4 => 4 * 8,
            Float32 => size_of::<f32>(),
            Float32Vec2 => 2 * size_of::<f32>(),
            Float32Vec3 => 3 * size_of::<f32>(),
            Float32Vec4 => 4 * size_of::<f32>(),
            Float64 => size_of::<f64>(),
            Float64Vec2 => 2 * size_of::<f64>(),
            Float64Vec3 => 3 * size_of::<f64>(),
            Float64Vec4 => 4 * size_of::<f64>(),
            Int32Box1 => 2 * 4,
            Int32Box2 => 4 * 4,
            Int32Box3 => 6 * 4,
            Int32Box4 => 8 * 4,
            Float32Box1 => 2 * size_of::<f32>(),
            Float32Box2 => 4 * size_of::<f32>(),
            Float32Box3 => 6 * size_of::<f32>(),
            Float32Box4 => 8 * size_of::<f32>(),
            Float32Mat2 => 4 * size_of::<f32>(),
            Float32Mat3 => 9 * size_of::<f32>(),
            Float32Mat4 => 16 * size_of::<f32>(),
            Float32Mat2x3 => 6 * size_of::<f32>(),
            Float32Mat3x4 => 12 * size_of::<f32>(),
            Float32QuatIjkw => 4 * size_of::<f32>(),
            _ => {
                debug_assert!(false, "no size defined for {}", self.name());
                0
            }
        }
    }

    /// Scalar family and component count of integer/float scalars and vectors.
    fn numeric_parts(self) -> Option<(DataType, usize)> {
        use crate::data_type::DataType::*;
        let parts = match self {
            Int8 => (Int8, 1),
            Int8Vec2 => (Int8, 2),
            Int8Vec3 => (Int8, 3),
            Int8Vec4 => (Int8, 4),
            UInt8 => (UInt8, 1),
            UInt8Vec2 => (UInt8, 2),
            UInt8Vec3 => (UInt8, 3),
            UInt8Vec4 => (UInt8, 4),
            Int16 => (Int16, 1),
            Int16Vec2 => (Int16, 2),
            Int16Vec3 => (Int16, 3),
            Int16Vec4 => (Int16, 4),
            UInt16 => (UInt16, 1),
            UInt16Vec2 => (UInt16, 2),
            UInt16Vec3 => (UInt16, 3),
            UInt16Vec4 => (UInt16, 4),
            Int32 => (Int32, 1),
            Int32Vec2 => (Int32, 2),
            Int32Vec3 => (Int32, 3),
            Int32Vec4 => (Int32, 4),
            UInt32 => (UInt32, 1),
            UInt32Vec2 => (UInt32, 2),
            UInt32Vec3 => (UInt32, 3),
            UInt32Vec4 => (UInt32, 4),
            Int64 => (Int64, 1),
            Int64Vec2 => (Int64, 2),
            Int64Vec3 => (Int64, 3),
            Int64Vec4 => (Int64, 4),
            UInt64 => (UInt64, 1),
            UInt64Vec2 => (UInt64, 2),
            UInt64Vec3 => (UInt64, 3),
            UInt64Vec4 => (UInt64, 4),
            Float32 => (Float32, 1),
            Float32Vec2 => (Float32, 2),
            Float32Vec3 => (Float32, 3),
            Float32Vec4 => (Float32, 4),
            Float64 => (Float64, 1),
            Float64Vec2 => (Float64, 2),
            Float64Vec3 => (Float64, 3),
            Float64Vec4 => (Float64, 4),
            _ => return None,
        };
        Some(parts)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TypeError::UnknownDataType(s.to_string()))
    }
}

impl TryFrom<String> for DataType {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(ty: DataType) -> Self {
        ty.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POINTER_WIDTH: usize = size_of::<*const ()>();

    #[test]
    fn names_are_unique_and_prefixed() {
        let mut names: Vec<&str> = DataType::ALL.iter().map(|t| t.name()).collect();
        assert!(names.iter().all(|n| n.starts_with(NAME_PREFIX)));
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn unknown_has_sentinel_name() {
        assert_eq!(DataType::Unknown.name(), "Unknown type");
        assert_eq!(DataType::Unknown.to_string(), UNKNOWN_TYPE_NAME);
        assert!(!DataType::ALL.contains(&DataType::Unknown));
    }

    #[test]
    fn from_name_accepts_optional_prefix() {
        assert_eq!(DataType::from_name("ANARI_FLOAT32_VEC3"), Some(DataType::Float32Vec3));
        assert_eq!(DataType::from_name("FLOAT32_VEC3"), Some(DataType::Float32Vec3));
        assert_eq!(DataType::from_name("FLOAT32_MAT2x3"), Some(DataType::Float32Mat2x3));
        assert_eq!(DataType::from_name("float32"), None);
        assert_eq!(DataType::from_name("Unknown type"), None);
    }

    #[test]
    fn every_name_parses_back() {
        for ty in DataType::ALL {
            assert_eq!(ty.name().parse::<DataType>().unwrap(), *ty);
        }
    }

    #[test]
    fn serde_uses_stable_names() {
        let json = serde_json::to_string(&DataType::SpatialField).unwrap();
        assert_eq!(json, "\"ANARI_SPATIAL_FIELD\"");
        let parsed: DataType = serde_json::from_str("\"UINT64\"").unwrap();
        assert_eq!(parsed, DataType::UInt64);
        assert!(serde_json::from_str::<DataType>("\"NOT_A_TYPE\"").is_err());
    }

    #[test]
    fn object_like_tags_have_pointer_width() {
        for ty in DataType::ALL.iter().filter(|t| t.is_object()) {
            assert_eq!(ty.size_of(), POINTER_WIDTH, "{ty}");
        }
        assert_eq!(DataType::Device.size_of(), POINTER_WIDTH);
        assert_eq!(DataType::Library.size_of(), POINTER_WIDTH);
        assert_eq!(DataType::String.size_of(), POINTER_WIDTH);
        assert_eq!(DataType::StatusCallback.size_of(), POINTER_WIDTH);
    }

    #[test]
    fn size_matches_shape_for_value_types() {
        let mut checked = 0;
        for ty in DataType::ALL {
            if let Some((element, count)) = ty.value_shape() {
                assert_eq!(ty.size_of(), count * element.size_of(), "{ty}");
                checked += 1;
            }
        }
        // 40 numeric + 1 bool + 36 fixed/srgb + 8 boxes + 5 matrices + 1 quaternion
        assert_eq!(checked, 91);
    }

    #[test]
    fn known_sizes() {
        assert_eq!(DataType::Float32Vec3.size_of(), 12);
        assert_eq!(DataType::Float64Vec4.size_of(), 32);
        assert_eq!(DataType::Float32Mat4.size_of(), 64);
        assert_eq!(DataType::Int32Box3.size_of(), 24);
        assert_eq!(DataType::UFixed8RgbaSrgb.size_of(), 4);
        assert_eq!(DataType::Bool.size_of(), 4);
        assert_eq!(DataType::DataType.size_of(), 4);
    }

    #[test]
    fn type_tag_variant_is_not_a_value() {
        let tag = DataType::DataType;
        assert_eq!(tag.value_shape(), None);
        assert_eq!(tag.components(), None);
        assert_eq!(tag.size_of(), size_of::<i32>());
        assert!(!tag.is_object());
        assert_eq!(tag.name(), "ANARI_DATA_TYPE");
    }

    #[test]
    fn numeric_scalars() {
        let scalars: Vec<DataType> = DataType::ALL
            .iter()
            .copied()
            .filter(|t| t.is_numeric_scalar())
            .collect();
        assert_eq!(scalars.len(), 10);
        assert!(!DataType::Fixed8.is_numeric_scalar());
        assert!(!DataType::Float32Vec2.is_numeric_scalar());
        assert!(DataType::Float32Vec2.is_numeric());
    }

    proptest! {
        #[test]
        fn scalar_has_one_component(index in 0..DataType::ALL.len()) {
            let ty = DataType::ALL[index];
            if let Some(scalar) = ty.scalar() {
                prop_assert_eq!(scalar.components(), Some(1));
                prop_assert_eq!(scalar.scalar(), Some(scalar));
                prop_assert_eq!(ty.size_of(), ty.components().unwrap() * scalar.size_of());
            }
        }
    }
}
