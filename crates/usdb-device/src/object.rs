//! Bridged objects.
//!
//! A [`BridgedObject`] composes the generic attributed-object capability
//! (parameter table, changed flag, name pair) with the prim handle that
//! records whether the object exists in the scene document. Kind-specific
//! behavior lives in its [`KindStrategy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use usdb_bridge::PrimKind;
use usdb_params::{sanitized, ParamError, ParamTable, ParamValue};
use usdb_types::{DataType, ObjectHandle, PrimHandle};

use crate::error::{DeviceError, DeviceResult, UnknownKind};
use crate::kinds::KindStrategy;

/// Write-only display name attribute.
pub const NAME_PARAM: &str = "name";
/// Read-only persisted name, exposed as a string property.
pub const USD_NAME_PROPERTY: &str = "usd::name";
/// Byte length of the persisted name, exposed as a UINT64 property.
pub const USD_NAME_SIZE_PROPERTY: &str = "usd::name.size";

/// The closed set of object kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Sampler,
    SpatialField,
    Instance,
    World,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Sampler,
        ObjectKind::SpatialField,
        ObjectKind::Instance,
        ObjectKind::World,
    ];

    /// Caller-side type tag of objects of this kind.
    pub fn data_type(self) -> DataType {
        match self {
            ObjectKind::Sampler => DataType::Sampler,
            ObjectKind::SpatialField => DataType::SpatialField,
            ObjectKind::Instance => DataType::Instance,
            ObjectKind::World => DataType::World,
        }
    }

    /// Kind of prim objects of this kind persist to.
    pub fn prim_kind(self) -> PrimKind {
        match self {
            ObjectKind::Sampler => PrimKind::Sampler,
            ObjectKind::SpatialField => PrimKind::SpatialField,
            ObjectKind::Instance => PrimKind::Instance,
            ObjectKind::World => PrimKind::World,
        }
    }

    /// Lower-case identifier, also used in auto-generated names.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Sampler => "sampler",
            ObjectKind::SpatialField => "spatial_field",
            ObjectKind::Instance => "instance",
            ObjectKind::World => "world",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// The names an object goes by.
///
/// `unique` is generated at creation and always a legal identifier. Once a
/// non-empty `name` is set, `display` holds it verbatim and `usd` holds its
/// sanitized form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectNames {
    unique: String,
    display: Option<String>,
    usd: Option<String>,
}

impl ObjectNames {
    pub fn new(unique: impl Into<String>) -> Self {
        Self {
            unique: unique.into(),
            display: None,
            usd: None,
        }
    }

    pub fn unique(&self) -> &str {
        &self.unique
    }

    /// Caller-chosen name, or the unique name if none was set.
    pub fn display(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.unique)
    }

    /// Name used for the prim and in diagnostics.
    pub fn usd(&self) -> &str {
        self.usd.as_deref().unwrap_or(&self.unique)
    }

    fn set(&mut self, name: &str) {
        self.display = Some(name.to_string());
        self.usd = Some(sanitized(name));
    }

    fn clear(&mut self) {
        self.display = None;
        self.usd = None;
    }
}

/// Result of a set or unset that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    Stored,
    /// A policy fallback applied; the message is reported as a warning.
    Ignored(String),
}

/// An object of kind `K` with its attribute state and persisted identity.
pub struct BridgedObject<K: KindStrategy> {
    handle: ObjectHandle,
    names: ObjectNames,
    pub(crate) table: ParamTable<K::Params>,
    pub(crate) prim: Option<PrimHandle>,
}

impl<K: KindStrategy> BridgedObject<K> {
    pub fn new(handle: ObjectHandle, unique_name: impl Into<String>) -> Self {
        Self {
            handle,
            names: ObjectNames::new(unique_name),
            table: ParamTable::new(K::schema()),
            prim: None,
        }
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    pub fn kind(&self) -> ObjectKind {
        K::KIND
    }

    /// Persisted name, used in every diagnostic about this object.
    pub fn name(&self) -> &str {
        self.names.usd()
    }

    pub fn names(&self) -> &ObjectNames {
        &self.names
    }

    pub fn params(&self) -> &K::Params {
        self.table.params()
    }

    pub fn is_changed(&self) -> bool {
        self.table.is_changed()
    }

    /// Prim handle, present once the object has been created in the document.
    pub fn prim(&self) -> Option<PrimHandle> {
        self.prim
    }

    /// Set an attribute, routing the two name attributes through the naming
    /// policy and everything else to the parameter table.
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> Result<SetOutcome, ParamError> {
        match name {
            NAME_PARAM => {
                let actual = value.data_type();
                let ParamValue::String(display) = value else {
                    return Err(ParamError::TypeMismatch {
                        name: name.to_string(),
                        expected: DataType::String,
                        actual,
                    });
                };
                if display.is_empty() {
                    return Ok(SetOutcome::Ignored(format!(
                        "'{}' name cannot be an empty string, using auto-generated name instead.",
                        self.name()
                    )));
                }
                self.names.set(&display);
                self.table.mark_changed();
                Ok(SetOutcome::Stored)
            }
            USD_NAME_PROPERTY => Ok(self.read_only_name()),
            _ => self.table.set(name, value).map(|()| SetOutcome::Stored),
        }
    }

    /// Restore an attribute to its default. Unsetting `name` brings back the
    /// auto-generated name.
    pub fn reset_param(&mut self, name: &str) -> Result<SetOutcome, ParamError> {
        match name {
            NAME_PARAM => {
                self.names.clear();
                self.table.mark_changed();
                Ok(SetOutcome::Stored)
            }
            USD_NAME_PROPERTY => Ok(self.read_only_name()),
            _ => self.table.reset(name).map(|()| SetOutcome::Stored),
        }
    }

    fn read_only_name(&self) -> SetOutcome {
        SetOutcome::Ignored(format!(
            "'{}' parameter '{USD_NAME_PROPERTY}' cannot be set, only read with getProperty().",
            self.name()
        ))
    }

    /// Query a property into `out`.
    ///
    /// Returns `Ok(false)` for unknown name/type pairs. Strings are written
    /// NUL-terminated and truncated to fit. Fixed-size properties require a
    /// buffer of exactly their size and write nothing otherwise.
    pub fn get_property(&self, name: &str, ty: DataType, out: &mut [u8]) -> DeviceResult<bool> {
        match (name, ty) {
            (USD_NAME_PROPERTY, DataType::String) => {
                write_c_string(self.name(), out);
                Ok(true)
            }
            (USD_NAME_SIZE_PROPERTY, DataType::UInt64) => {
                let expected = std::mem::size_of::<u64>();
                if out.len() != expected {
                    return Err(DeviceError::PropertyBuffer {
                        object: self.name().to_string(),
                        property: USD_NAME_SIZE_PROPERTY,
                        expected,
                        actual: out.len(),
                    });
                }
                out.copy_from_slice(&(self.name().len() as u64).to_ne_bytes());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl<K: KindStrategy> fmt::Debug for BridgedObject<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgedObject")
            .field("kind", &K::KIND)
            .field("handle", &self.handle)
            .field("names", &self.names)
            .field("prim", &self.prim)
            .field("changed", &self.table.is_changed())
            .finish()
    }
}

fn write_c_string(s: &str, out: &mut [u8]) {
    let Some(room) = out.len().checked_sub(1) else {
        return;
    };
    let n = s.len().min(room);
    out[..n].copy_from_slice(&s.as_bytes()[..n]);
    out[n] = 0;
}
