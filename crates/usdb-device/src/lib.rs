//! Commit engine of the USD scene bridge.
//!
//! A [`Device`] receives attribute mutations on a closed set of object kinds
//! and, on each commit, projects the committed state into a scene document
//! through a [`SceneBridge`](usdb_bridge::SceneBridge).
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use usdb_bridge::{InMemoryBridge, SceneBridge};
//! use usdb_device::{Device, DeviceConfig, ObjectKind, RecordingSink};
//! use usdb_params::DataArray;
//!
//! let bridge = Arc::new(InMemoryBridge::new());
//! let sink = Arc::new(RecordingSink::new());
//! let backend: Arc<dyn SceneBridge> = bridge.clone();
//! let mut device = Device::new(DeviceConfig::default(), Some(backend), sink.clone()).unwrap();
//!
//! let field = device.new_object(ObjectKind::SpatialField);
//! device.set_param(field, "name", "density".into()).unwrap();
//! device.set_param(field, "data", DataArray::from_values(&[0.5f32; 64]).into()).unwrap();
//! device.commit(field).unwrap();
//!
//! assert!(bridge.snapshot().prim("/fields/density").is_some());
//! assert!(sink.errors().is_empty());
//! ```
//!
//! # Modules
//!
//! - [`object`] -- bridged objects, object kinds, the naming policy
//! - [`kinds`] -- per-kind schemas and commit strategies
//! - [`commit`] -- the generic commit protocol
//! - [`resolver`] -- object handle to prim handle resolution
//! - [`device`] -- the facade and its status reporting
//! - [`status`] -- the status channel

pub mod commit;
pub mod config;
pub mod device;
pub mod error;
pub mod kinds;
pub mod object;
pub mod resolver;
pub mod status;

pub use commit::CommitOutcome;
pub use config::{DeviceConfig, LifetimePolicy, SavePolicy};
pub use device::{Device, SceneObject, TIME_STEP_PARAM};
pub use error::{CommitError, DeviceError, DeviceResult, UnknownKind};
pub use kinds::{CommitContext, KindStrategy, Staged};
pub use object::{BridgedObject, ObjectKind, ObjectNames, SetOutcome};
pub use resolver::{push_references, resolve_references, ObjectLookup, RefUpdate, ResolvedObject};
pub use status::{RecordingSink, StatusReport, StatusSink, TracingSink};
