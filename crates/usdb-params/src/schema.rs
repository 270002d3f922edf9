//! Declarative per-kind attribute schemas.
//!
//! Each object kind declares its recognized attributes once, as a static
//! table of [`ParamDecl`]s: the attribute name, its declared [`DataType`],
//! and an accessor that exposes the typed storage slot inside the kind's
//! parameter struct. The table is shared read-only by every object of the
//! kind.
//!
//! ```
//! use usdb_params::{ParamDecl, ParamSchema, Slot};
//! use usdb_types::DataType;
//!
//! #[derive(Default)]
//! struct LightParams {
//!     intensity: f64,
//! }
//!
//! static LIGHT: ParamSchema<LightParams> = ParamSchema {
//!     kind: "light",
//!     decls: &[ParamDecl {
//!         name: "intensity",
//!         ty: DataType::Float64,
//!         slot: |p| Slot::Float64(&mut p.intensity),
//!     }],
//! };
//!
//! assert!(LIGHT.find("intensity").is_some());
//! assert!(LIGHT.find("color").is_none());
//! ```

use std::fmt;
use std::sync::Arc;

use usdb_types::DataType;

use crate::array::DataArray;
use crate::value::ParamValue;

/// Mutable view of one typed storage slot in a parameter struct.
pub enum Slot<'a> {
    Str(&'a mut Option<String>),
    Int32(&'a mut i32),
    Float64(&'a mut f64),
    Float32Vec3(&'a mut [f32; 3]),
    Float32Mat4(&'a mut [f32; 16]),
    Array(&'a mut Option<Arc<DataArray>>),
}

impl Slot<'_> {
    /// Store `value` into the slot. Returns `false`, leaving the slot
    /// untouched, if the value's variant does not fit the slot.
    pub fn store(self, value: ParamValue) -> bool {
        match (self, value) {
            (Slot::Str(slot), ParamValue::String(v)) => *slot = Some(v),
            (Slot::Int32(slot), ParamValue::Int32(v)) => *slot = v,
            (Slot::Float64(slot), ParamValue::Float64(v)) => *slot = v,
            (Slot::Float32Vec3(slot), ParamValue::Float32Vec3(v)) => *slot = v,
            (Slot::Float32Mat4(slot), ParamValue::Float32Mat4(v)) => *slot = v,
            (Slot::Array(slot), ParamValue::Array(v)) => *slot = Some(v),
            _ => return false,
        }
        true
    }

    /// Overwrite the slot with the matching slot of a default-constructed
    /// parameter struct.
    pub fn reset_from(self, default: Slot<'_>) {
        match (self, default) {
            (Slot::Str(slot), Slot::Str(d)) => *slot = d.take(),
            (Slot::Int32(slot), Slot::Int32(d)) => *slot = *d,
            (Slot::Float64(slot), Slot::Float64(d)) => *slot = *d,
            (Slot::Float32Vec3(slot), Slot::Float32Vec3(d)) => *slot = *d,
            (Slot::Float32Mat4(slot), Slot::Float32Mat4(d)) => *slot = *d,
            (Slot::Array(slot), Slot::Array(d)) => *slot = d.take(),
            _ => {}
        }
    }
}

/// One recognized attribute of an object kind.
pub struct ParamDecl<P: 'static> {
    /// Case-sensitive attribute name.
    pub name: &'static str,
    /// Declared type tag.
    pub ty: DataType,
    /// Accessor for the attribute's storage slot.
    pub slot: fn(&mut P) -> Slot<'_>,
}

impl<P> ParamDecl<P> {
    /// Returns `true` if a value tagged `ty` may be stored here.
    ///
    /// Array attributes accept arrays of any rank; the rank is validated at
    /// commit time.
    pub fn accepts(&self, ty: DataType) -> bool {
        self.ty == ty || (self.ty.is_array() && ty.is_array())
    }
}

impl<P> fmt::Debug for ParamDecl<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDecl")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish()
    }
}

/// Ordered attribute declarations of one object kind.
pub struct ParamSchema<P: 'static> {
    /// Object kind name, used in diagnostics.
    pub kind: &'static str,
    /// Declarations in declaration order.
    pub decls: &'static [ParamDecl<P>],
}

impl<P> ParamSchema<P> {
    /// Object kind name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// All declarations in declaration order.
    pub fn decls(&self) -> &'static [ParamDecl<P>] {
        self.decls
    }

    /// Look up a declaration by exact name.
    pub fn find(&self, name: &str) -> Option<&'static ParamDecl<P>> {
        self.decls.iter().find(|d| d.name == name)
    }
}

impl<P> fmt::Debug for ParamSchema<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSchema")
            .field("kind", &self.kind)
            .field("decls", &self.decls)
            .finish()
    }
}
