//! Persistence contract for the USD scene bridge.
//!
//! The bridge is the collaborator that durably stores committed object state
//! in a hierarchical scene document. This crate defines what the commit
//! engine asks of it and ships one backend.
//!
//! # Architecture
//!
//! - Every committed object becomes a *prim* at `/<scope>/<name>`, where the
//!   scope is fixed by its [`PrimKind`].
//! - Creation is idempotent by path: asking for an existing prim returns its
//!   handle with `is_new == false`.
//! - Attribute bundles ([`SamplerData`], [`SpatialFieldData`],
//!   [`InstanceData`]) are written whole. When a bundle declares time-varying
//!   members it is recorded at the given time code, otherwise it replaces the
//!   prim's default value.
//! - Reference lists are replaced wholesale or cleared, never patched.
//!
//! # Backends
//!
//! All backends implement the [`SceneBridge`] trait:
//!
//! - [`InMemoryBridge`] -- document held in memory, with a call journal for
//!   tests and a serializable snapshot

pub mod error;
pub mod log;
pub mod memory;
pub mod prim;
pub mod traits;

pub use error::{BridgeError, BridgeResult};
pub use log::{BridgeLogEntry, BridgeLogLevel};
pub use memory::{
    AttributeSnapshot, BridgeCall, DocumentSnapshot, InMemoryBridge, PrimSnapshot, TimedRefs,
    TimedValue,
};
pub use prim::{
    CreatedPrim, InstanceData, Member, PrimData, PrimKind, SamplerData, SpatialFieldData, WrapMode,
};
pub use traits::SceneBridge;
