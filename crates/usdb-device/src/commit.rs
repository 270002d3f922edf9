//! The per-object commit protocol.
//!
//! One call to [`BridgedObject::commit`] runs these steps:
//!
//! 1. Without a bridge the commit is a no-op.
//! 2. If the table changed or the object has no prim yet, the kind validates
//!    its attributes and builds a bundle. A failure aborts the commit with
//!    the object's state untouched.
//! 3. An object without a prim asks the bridge to create one.
//! 4. If the table changed or the prim is new, the bundle is written and the
//!    changed flag is cleared.
//! 5. The kind's unconditional side effect runs.
//!
//! A second commit without intervening mutation skips steps 2 to 4.

use tracing::{debug, trace};
use usdb_bridge::BridgeError;

use crate::error::CommitError;
use crate::kinds::{CommitContext, KindStrategy};
use crate::object::BridgedObject;

/// What a successful commit did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// No bridge is attached.
    Detached,
    /// Nothing changed since the last commit; no attribute writes.
    Unchanged,
    /// Attributes were written. `created` is set when the prim was new.
    Written { created: bool },
}

impl<K: KindStrategy> BridgedObject<K> {
    /// Reconcile pending attribute state into the scene document.
    pub fn commit(&mut self, ctx: &CommitContext<'_>) -> Result<CommitOutcome, CommitError> {
        let Some(bridge) = ctx.bridge else {
            trace!(object = self.name(), "commit without bridge");
            return Ok(CommitOutcome::Detached);
        };
        let name = self.name().to_string();
        let bridge_error = |source: BridgeError| CommitError::Bridge {
            object: name.clone(),
            source,
        };

        let mut outcome = CommitOutcome::Unchanged;
        if self.table.is_changed() || self.prim.is_none() {
            let bundle = K::validate(&name, self.table.params(), ctx)?;

            let (prim, is_new) = match self.prim {
                Some(prim) => (prim, false),
                None => {
                    let created = bridge
                        .create_prim(K::KIND.prim_kind(), &name)
                        .map_err(bridge_error)?;
                    self.prim = Some(created.handle);
                    if created.is_new {
                        // Keeps the first write pending if it fails below.
                        self.table.mark_changed();
                    }
                    (created.handle, created.is_new)
                }
            };

            if self.table.is_changed() || is_new {
                K::write(bridge, prim, &bundle).map_err(bridge_error)?;
                self.table.clear_changed();
                outcome = CommitOutcome::Written { created: is_new };
                debug!(object = %name, kind = %K::KIND, %prim, created = is_new, "committed");
            }
        }

        K::after_commit(bridge, ctx).map_err(bridge_error)?;
        Ok(outcome)
    }

    /// Delete the persisted counterpart, if any.
    pub fn release(&mut self, ctx: &CommitContext<'_>) -> Result<bool, CommitError> {
        let (Some(bridge), Some(prim)) = (ctx.bridge, self.prim) else {
            return Ok(false);
        };
        K::release(bridge, prim, self.table.params(), ctx).map_err(|source| CommitError::Bridge {
            object: self.name().to_string(),
            source,
        })?;
        self.prim = None;
        debug!(object = self.name(), %prim, "deleted prim on release");
        Ok(true)
    }
}
