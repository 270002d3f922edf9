//! Bulk data arrays and their shape descriptors.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use usdb_types::{DataType, ObjectHandle};

use crate::error::{ParamError, Result};

/// Shape of a data array: dimensionality, per-axis item counts, and per-axis
/// strides in elements (`0` means tightly packed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLayout {
    /// Number of axes, 1 to 3.
    pub dimensions: u8,
    /// Item count along each axis. Unused axes hold 1.
    pub num_items: [u64; 3],
    /// Stride along each axis, in elements. All zero for dense arrays.
    pub strides: [i64; 3],
}

impl DataLayout {
    /// Dense 1-D layout with `n` items.
    pub fn one_dimensional(n: u64) -> Self {
        Self {
            dimensions: 1,
            num_items: [n, 1, 1],
            strides: [0; 3],
        }
    }

    /// Dense 2-D layout.
    pub fn two_dimensional(n1: u64, n2: u64) -> Self {
        Self {
            dimensions: 2,
            num_items: [n1, n2, 1],
            strides: [0; 3],
        }
    }

    /// Dense 3-D layout.
    pub fn three_dimensional(n1: u64, n2: u64, n3: u64) -> Self {
        Self {
            dimensions: 3,
            num_items: [n1, n2, n3],
            strides: [0; 3],
        }
    }

    /// Same shape with explicit per-axis strides.
    pub fn with_strides(mut self, strides: [i64; 3]) -> Self {
        self.strides = strides;
        self
    }

    fn axes(&self) -> &[u64] {
        &self.num_items[..usize::from(self.dimensions.clamp(1, 3))]
    }

    /// Total number of items across all axes, or `None` if the product
    /// overflows.
    pub fn checked_total_items(&self) -> Option<u64> {
        self.axes().iter().try_fold(1u64, |acc, &n| acc.checked_mul(n))
    }

    /// Total number of items across all axes, saturating at `u64::MAX`.
    pub fn total_items(&self) -> u64 {
        self.axes().iter().fold(1u64, |acc, &n| acc.saturating_mul(n))
    }

    /// Returns `true` if the array has exactly one axis.
    pub fn is_one_dimensional(&self) -> bool {
        self.dimensions == 1
    }

    /// Returns `true` if every stride is zero.
    pub fn is_dense(&self) -> bool {
        self.strides.iter().all(|&s| s == 0)
    }

    /// The array handle tag matching this layout's rank.
    pub fn array_type(&self) -> DataType {
        match self.dimensions {
            1 => DataType::Array1D,
            2 => DataType::Array2D,
            3 => DataType::Array3D,
            _ => DataType::Array,
        }
    }
}

/// Element storage of a [`DataArray`].
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayData {
    /// Little-endian packed values of a value-like element type.
    Bytes(Bytes),
    /// Object handles of an object-like element type.
    Handles(Vec<ObjectHandle>),
}

/// A typed, shaped block of attribute data.
#[derive(Clone, Debug, PartialEq)]
pub struct DataArray {
    element_type: DataType,
    layout: DataLayout,
    data: ArrayData,
}

/// Scalar element types that can be packed into a [`DataArray`].
pub trait ArrayElement: Copy {
    /// The element's type tag.
    const DATA_TYPE: DataType;

    /// Append this value's little-endian bytes.
    fn write_le(&self, out: &mut Vec<u8>);
}

macro_rules! impl_array_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                const DATA_TYPE: DataType = DataType::$tag;

                fn write_le(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_array_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl DataArray {
    /// Dense 1-D array of scalar values.
    pub fn from_values<T: ArrayElement>(values: &[T]) -> Self {
        let mut bytes = Vec::with_capacity(values.len() * T::DATA_TYPE.size_of());
        for v in values {
            v.write_le(&mut bytes);
        }
        Self {
            element_type: T::DATA_TYPE,
            layout: DataLayout::one_dimensional(values.len() as u64),
            data: ArrayData::Bytes(Bytes::from(bytes)),
        }
    }

    /// Array over raw little-endian bytes.
    ///
    /// The element type must be value-like. For dense layouts the byte count
    /// must equal `total_items * element size`.
    pub fn from_bytes(element_type: DataType, layout: DataLayout, bytes: Bytes) -> Result<Self> {
        if element_type.value_shape().is_none() {
            return Err(ParamError::InvalidArray(format!(
                "{element_type} is not a value type"
            )));
        }
        check_payload(element_type, &layout, bytes.len(), element_type.size_of())?;
        Ok(Self {
            element_type,
            layout,
            data: ArrayData::Bytes(bytes),
        })
    }

    /// Dense 1-D array of object handles.
    pub fn from_handles(element_type: DataType, handles: Vec<ObjectHandle>) -> Result<Self> {
        if !element_type.is_object() {
            return Err(ParamError::InvalidArray(format!(
                "{element_type} is not an object type"
            )));
        }
        Ok(Self {
            element_type,
            layout: DataLayout::one_dimensional(handles.len() as u64),
            data: ArrayData::Handles(handles),
        })
    }

    /// Replace the shape while keeping the payload, e.g. to view a flat
    /// buffer as a volume. Dense layouts must cover the payload exactly.
    pub fn with_layout(mut self, layout: DataLayout) -> Result<Self> {
        let (len, unit) = match &self.data {
            ArrayData::Bytes(b) => (b.len(), self.element_type.size_of()),
            ArrayData::Handles(h) => (h.len(), 1),
        };
        check_payload(self.element_type, &layout, len, unit)?;
        self.layout = layout;
        Ok(self)
    }

    /// Element type tag.
    pub fn element_type(&self) -> DataType {
        self.element_type
    }

    /// Shape descriptor.
    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Array handle tag for this array's rank.
    pub fn array_type(&self) -> DataType {
        self.layout.array_type()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.layout.total_items() as usize
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw payload of a value array.
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.data {
            ArrayData::Bytes(b) => Some(b),
            ArrayData::Handles(_) => None,
        }
    }

    /// Handles of an object array.
    pub fn handles(&self) -> Option<&[ObjectHandle]> {
        match &self.data {
            ArrayData::Handles(h) => Some(h),
            ArrayData::Bytes(_) => None,
        }
    }

    /// Element storage.
    pub fn data(&self) -> &ArrayData {
        &self.data
    }
}

/// Check that `len` payload units of `unit` each fit `layout`. Only dense
/// layouts are checked against the length; every layout must have a
/// representable item count.
fn check_payload(
    element_type: DataType,
    layout: &DataLayout,
    len: usize,
    unit: usize,
) -> Result<()> {
    let items = layout
        .checked_total_items()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            ParamError::InvalidArray(format!("item count of {:?} overflows", layout.num_items))
        })?;
    if !layout.is_dense() {
        return Ok(());
    }
    let expected = items.checked_mul(unit).ok_or_else(|| {
        ParamError::InvalidArray(format!("{items} x {element_type} overflows"))
    })?;
    if len != expected {
        return Err(ParamError::InvalidArray(format!(
            "expected {expected} payload units for {items} x {element_type}, got {len}"
        )));
    }
    Ok(())
}
