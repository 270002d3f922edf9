//! Dynamically-typed attribute values.

use std::sync::Arc;

use usdb_types::{DataType, ObjectHandle};

use crate::array::DataArray;

/// A value passed to a parameter set operation, tagged by its [`DataType`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    String(String),
    Int32(i32),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Float32Vec3([f32; 3]),
    Float32Mat4([f32; 16]),
    /// A shared data array. Its tag is the array handle type for its rank.
    Array(Arc<DataArray>),
    /// A handle to another object, tagged with the object's kind.
    Object { ty: DataType, handle: ObjectHandle },
}

impl ParamValue {
    /// Type tag of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            ParamValue::String(_) => DataType::String,
            ParamValue::Int32(_) => DataType::Int32,
            ParamValue::UInt32(_) => DataType::UInt32,
            ParamValue::UInt64(_) => DataType::UInt64,
            ParamValue::Float32(_) => DataType::Float32,
            ParamValue::Float64(_) => DataType::Float64,
            ParamValue::Float32Vec3(_) => DataType::Float32Vec3,
            ParamValue::Float32Mat4(_) => DataType::Float32Mat4,
            ParamValue::Array(array) => array.array_type(),
            ParamValue::Object { ty, .. } => *ty,
        }
    }

    /// Wrap an array.
    pub fn array(array: DataArray) -> Self {
        ParamValue::Array(Arc::new(array))
    }

    /// String contents, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float64(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int32(v)
    }
}

impl From<[f32; 3]> for ParamValue {
    fn from(v: [f32; 3]) -> Self {
        ParamValue::Float32Vec3(v)
    }
}

impl From<DataArray> for ParamValue {
    fn from(array: DataArray) -> Self {
        ParamValue::array(array)
    }
}
