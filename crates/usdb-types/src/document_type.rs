//! Projection of caller-side [`DataType`] tags onto the scene document's
//! native storage types.
//!
//! Two projections exist. [`DataType::to_document_type`] preserves the
//! component count. [`DataType::to_document_type_flattened`] collapses any
//! vector to its scalar element type, for attributes whose component count is
//! carried by the array shape instead of the element type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

/// Native storage type of a scene document attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// No document representation. Fatal for the attribute that needs one.
    Undefined,
    UChar,
    UChar2,
    UChar3,
    UChar4,
    Char,
    Char2,
    Char3,
    Char4,
    UShort,
    UShort2,
    UShort3,
    UShort4,
    Short,
    Short2,
    Short3,
    Short4,
    UInt,
    UInt2,
    UInt3,
    UInt4,
    Int,
    Int2,
    Int3,
    Int4,
    Long,
    Long2,
    Long3,
    Long4,
    ULong,
    ULong2,
    ULong3,
    ULong4,
    Float,
    Float2,
    Float3,
    Float4,
    Double,
    Double2,
    Double3,
    Double4,
}

impl DocumentType {
    /// Returns `true` unless this is [`DocumentType::Undefined`].
    pub fn is_defined(self) -> bool {
        self != DocumentType::Undefined
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl DataType {
    /// Document type with the same scalar family and component count.
    ///
    /// Only integer and float scalars and 2-4 component vectors have a
    /// document representation; everything else is `Undefined`.
    pub fn to_document_type(self) -> DocumentType {
        match self {
            DataType::UInt8 => DocumentType::UChar,
            DataType::UInt8Vec2 => DocumentType::UChar2,
            DataType::UInt8Vec3 => DocumentType::UChar3,
            DataType::UInt8Vec4 => DocumentType::UChar4,
            DataType::Int8 => DocumentType::Char,
            DataType::Int8Vec2 => DocumentType::Char2,
            DataType::Int8Vec3 => DocumentType::Char3,
            DataType::Int8Vec4 => DocumentType::Char4,

            DataType::UInt16 => DocumentType::UShort,
            DataType::UInt16Vec2 => DocumentType::UShort2,
            DataType::UInt16Vec3 => DocumentType::UShort3,
            DataType::UInt16Vec4 => DocumentType::UShort4,
            DataType::Int16 => DocumentType::Short,
            DataType::Int16Vec2 => DocumentType::Short2,
            DataType::Int16Vec3 => DocumentType::Short3,
            DataType::Int16Vec4 => DocumentType::Short4,

            DataType::UInt32 => DocumentType::UInt,
            DataType::UInt32Vec2 => DocumentType::UInt2,
            DataType::UInt32Vec3 => DocumentType::UInt3,
            DataType::UInt32Vec4 => DocumentType::UInt4,
            DataType::Int32 => DocumentType::Int,
            DataType::Int32Vec2 => DocumentType::Int2,
            DataType::Int32Vec3 => DocumentType::Int3,
            DataType::Int32Vec4 => DocumentType::Int4,

            DataType::Int64 => DocumentType::Long,
            DataType::Int64Vec2 => DocumentType::Long2,
            DataType::Int64Vec3 => DocumentType::Long3,
            DataType::Int64Vec4 => DocumentType::Long4,
            DataType::UInt64 => DocumentType::ULong,
            DataType::UInt64Vec2 => DocumentType::ULong2,
            DataType::UInt64Vec3 => DocumentType::ULong3,
            DataType::UInt64Vec4 => DocumentType::ULong4,

            DataType::Float32 => DocumentType::Float,
            DataType::Float32Vec2 => DocumentType::Float2,
            DataType::Float32Vec3 => DocumentType::Float3,
            DataType::Float32Vec4 => DocumentType::Float4,

            DataType::Float64 => DocumentType::Double,
            DataType::Float64Vec2 => DocumentType::Double2,
            DataType::Float64Vec3 => DocumentType::Double3,
            DataType::Float64Vec4 => DocumentType::Double4,

            _ => DocumentType::Undefined,
        }
    }

    /// Document type of the scalar element, dropping the component count.
    pub fn to_document_type_flattened(self) -> DocumentType {
        match self.scalar() {
            Some(scalar) => scalar.to_document_type(),
            None => DocumentType::Undefined,
        }
    }
}
