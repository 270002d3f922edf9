//! The per-object attribute table.

use tracing::trace;

use crate::error::{ParamError, Result};
use crate::schema::ParamSchema;
use crate::value::ParamValue;

/// Typed attribute store of one object, with a table-wide changed flag.
///
/// The flag is raised by every successful [`set`](Self::set) or
/// [`reset`](Self::reset) and is cleared only by the owner after a
/// successful commit.
pub struct ParamTable<P: 'static> {
    schema: &'static ParamSchema<P>,
    params: P,
    changed: bool,
}

impl<P: Default> ParamTable<P> {
    /// Create a table holding the schema's defaults.
    pub fn new(schema: &'static ParamSchema<P>) -> Self {
        Self {
            schema,
            params: P::default(),
            changed: false,
        }
    }

    /// Store `value` under `name`, overwriting any previous value.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<()> {
        let decl = self.schema.find(name).ok_or_else(|| ParamError::UnknownParam {
            kind: self.schema.kind(),
            name: name.to_string(),
        })?;
        let actual = value.data_type();
        let mismatch = || ParamError::TypeMismatch {
            name: name.to_string(),
            expected: decl.ty,
            actual,
        };
        if !decl.accepts(actual) {
            return Err(mismatch());
        }
        if !(decl.slot)(&mut self.params).store(value) {
            return Err(mismatch());
        }
        self.changed = true;
        trace!(kind = self.schema.kind(), param = name, ty = %actual, "param set");
        Ok(())
    }

    /// Restore `name` to its default value.
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let decl = self.schema.find(name).ok_or_else(|| ParamError::UnknownParam {
            kind: self.schema.kind(),
            name: name.to_string(),
        })?;
        let mut defaults = P::default();
        (decl.slot)(&mut self.params).reset_from((decl.slot)(&mut defaults));
        self.changed = true;
        trace!(kind = self.schema.kind(), param = name, "param reset");
        Ok(())
    }
}

impl<P> ParamTable<P> {
    /// The schema this table follows.
    pub fn schema(&self) -> &'static ParamSchema<P> {
        self.schema
    }

    /// Current attribute values.
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Returns `true` if any attribute changed since the last commit.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Raise the changed flag without touching any attribute.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Clear the changed flag after a successful commit.
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }
}

impl<P> std::fmt::Debug for ParamTable<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamTable")
            .field("kind", &self.schema.kind())
            .field("changed", &self.changed)
            .finish()
    }
}
