//! In-memory scene document.
//!
//! [`InMemoryBridge`] keeps the whole document behind a `RwLock` and journals
//! every call it receives, so tests can assert exactly which writes the
//! commit engine issued. [`InMemoryBridge::snapshot`] renders the document
//! as a serializable tree keyed by prim path.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use usdb_params::is_valid_identifier;
use usdb_types::{PrimHandle, TimeCode};

use crate::error::{BridgeError, BridgeResult};
use crate::log::{BridgeLogEntry, BridgeLogLevel};
use crate::prim::{
    CreatedPrim, InstanceData, PrimData, PrimKind, SamplerData, SpatialFieldData,
};
use crate::traits::SceneBridge;

/// One call received by an [`InMemoryBridge`], in arrival order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BridgeCall {
    CreatePrim {
        kind: PrimKind,
        name: String,
        is_new: bool,
    },
    DeletePrim {
        handle: PrimHandle,
    },
    SetData {
        handle: PrimHandle,
        kind: PrimKind,
        time: TimeCode,
    },
    SetInstanceRefs {
        world: PrimHandle,
        instances: Vec<PrimHandle>,
        time_varying: bool,
        time: TimeCode,
    },
    DeleteInstanceRefs {
        world: PrimHandle,
        time_varying: bool,
        time: TimeCode,
    },
    SaveScene,
}

#[derive(Debug, Default)]
struct Attribute {
    default: Option<Value>,
    timed: BTreeMap<TimeCode, Value>,
}

#[derive(Debug)]
struct PrimRecord {
    kind: PrimKind,
    path: String,
    attributes: BTreeMap<&'static str, Attribute>,
    refs: Vec<PrimHandle>,
    timed_refs: BTreeMap<TimeCode, Vec<PrimHandle>>,
}

#[derive(Debug, Default)]
struct Document {
    next_handle: u64,
    prims: BTreeMap<PrimHandle, PrimRecord>,
    paths: HashMap<String, PrimHandle>,
    save_count: u64,
}

impl Document {
    fn prim_mut(&mut self, handle: PrimHandle, expected: PrimKind) -> BridgeResult<&mut PrimRecord> {
        let prim = self
            .prims
            .get_mut(&handle)
            .ok_or(BridgeError::UnknownPrim(handle))?;
        if prim.kind != expected {
            return Err(BridgeError::KindMismatch {
                handle,
                expected,
                actual: prim.kind,
            });
        }
        Ok(prim)
    }

    fn check_kind(&self, handle: PrimHandle, expected: PrimKind) -> BridgeResult<()> {
        match self.prims.get(&handle) {
            None => Err(BridgeError::UnknownPrim(handle)),
            Some(p) if p.kind != expected => Err(BridgeError::KindMismatch {
                handle,
                expected,
                actual: p.kind,
            }),
            Some(_) => Ok(()),
        }
    }

    fn path_or_handle(&self, handle: PrimHandle) -> String {
        self.prims
            .get(&handle)
            .map(|p| p.path.clone())
            .unwrap_or_else(|| handle.to_string())
    }
}

/// An in-memory implementation of [`SceneBridge`].
///
/// Data is lost when the bridge is dropped. Prim handles are allocated from 1
/// and never reused.
#[derive(Debug, Default)]
pub struct InMemoryBridge {
    document: RwLock<Document>,
    journal: Mutex<Vec<BridgeCall>>,
    log: Mutex<Vec<BridgeLogEntry>>,
}

impl InMemoryBridge {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far.
    pub fn journal(&self) -> Vec<BridgeCall> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of journaled calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&BridgeCall) -> bool) -> usize {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    /// Number of create requests, including ones that reused a prim.
    pub fn create_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, BridgeCall::CreatePrim { .. }))
    }

    /// Number of attribute bundle writes.
    pub fn data_writes(&self) -> usize {
        self.count_calls(|c| matches!(c, BridgeCall::SetData { .. }))
    }

    /// Number of completed whole-document saves.
    pub fn save_count(&self) -> u64 {
        self.read_document().save_count
    }

    /// Number of prims in the document.
    pub fn len(&self) -> usize {
        self.read_document().prims.len()
    }

    /// Returns `true` if the document holds no prims.
    pub fn is_empty(&self) -> bool {
        self.read_document().prims.is_empty()
    }

    /// Path of a live prim.
    pub fn path_of(&self, handle: PrimHandle) -> Option<String> {
        self.read_document().prims.get(&handle).map(|p| p.path.clone())
    }

    /// Handle of the prim at `path`.
    pub fn handle_at(&self, path: &str) -> Option<PrimHandle> {
        self.read_document().paths.get(path).copied()
    }

    /// Serializable view of the whole document, prims sorted by path.
    pub fn snapshot(&self) -> DocumentSnapshot {
        let doc = self.read_document();
        let mut prims: Vec<PrimSnapshot> = doc
            .prims
            .values()
            .map(|prim| PrimSnapshot {
                path: prim.path.clone(),
                kind: prim.kind,
                attributes: prim
                    .attributes
                    .iter()
                    .map(|(name, attr)| {
                        let timed = attr
                            .timed
                            .iter()
                            .map(|(t, v)| TimedValue {
                                time: t.value(),
                                value: v.clone(),
                            })
                            .collect();
                        (
                            (*name).to_string(),
                            AttributeSnapshot {
                                default: attr.default.clone(),
                                timed,
                            },
                        )
                    })
                    .collect(),
                refs: prim.refs.iter().map(|h| doc.path_or_handle(*h)).collect(),
                timed_refs: prim
                    .timed_refs
                    .iter()
                    .map(|(t, refs)| TimedRefs {
                        time: t.value(),
                        targets: refs.iter().map(|h| doc.path_or_handle(*h)).collect(),
                    })
                    .collect(),
            })
            .collect();
        prims.sort_by(|a, b| a.path.cmp(&b.path));
        DocumentSnapshot {
            prims,
            save_count: doc.save_count,
        }
    }

    fn read_document(&self) -> RwLockReadGuard<'_, Document> {
        self.document.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_document(&self) -> BridgeResult<RwLockWriteGuard<'_, Document>> {
        self.document
            .write()
            .map_err(|e| BridgeError::Lock(e.to_string()))
    }

    fn record(&self, call: BridgeCall) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn queue_log(&self, level: BridgeLogLevel, message: String) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(BridgeLogEntry::new(level, message));
    }

    fn write_data(&self, handle: PrimHandle, data: PrimData, time: TimeCode) -> BridgeResult<()> {
        let kind = data.kind();
        self.record(BridgeCall::SetData { handle, kind, time });

        let mut doc = self.write_document()?;
        let prim = doc.prim_mut(handle, kind)?;
        let mask = data.time_varying();
        for member in data.members() {
            let attr = prim.attributes.entry(member.name).or_default();
            if member.bit != 0 && mask & member.bit != 0 {
                attr.timed.insert(time, member.value);
            } else {
                attr.default = Some(member.value);
            }
        }
        debug!(path = %prim.path, %time, mask, "wrote prim data");
        Ok(())
    }
}

impl SceneBridge for InMemoryBridge {
    fn create_prim(&self, kind: PrimKind, name: &str) -> BridgeResult<CreatedPrim> {
        if !is_valid_identifier(name) {
            return Err(BridgeError::InvalidName(name.to_string()));
        }
        let path = kind.path_for(name);

        let mut doc = self.write_document()?;
        let existing = doc.paths.get(&path).copied();
        if let Some(handle) = existing {
            drop(doc);
            self.record(BridgeCall::CreatePrim {
                kind,
                name: name.to_string(),
                is_new: false,
            });
            self.queue_log(
                BridgeLogLevel::Status,
                format!("prim {path} already exists, reusing it"),
            );
            return Ok(CreatedPrim {
                handle,
                is_new: false,
            });
        }

        doc.next_handle += 1;
        let handle = PrimHandle::from_raw(doc.next_handle);
        doc.paths.insert(path.clone(), handle);
        doc.prims.insert(
            handle,
            PrimRecord {
                kind,
                path: path.clone(),
                attributes: BTreeMap::new(),
                refs: Vec::new(),
                timed_refs: BTreeMap::new(),
            },
        );
        drop(doc);

        self.record(BridgeCall::CreatePrim {
            kind,
            name: name.to_string(),
            is_new: true,
        });
        debug!(%path, %handle, "created prim");
        Ok(CreatedPrim {
            handle,
            is_new: true,
        })
    }

    fn delete_prim(&self, handle: PrimHandle) -> BridgeResult<bool> {
        self.record(BridgeCall::DeletePrim { handle });
        let mut doc = self.write_document()?;
        let removed = doc.prims.remove(&handle);
        match removed {
            Some(prim) => {
                doc.paths.remove(&prim.path);
                debug!(path = %prim.path, "deleted prim");
                Ok(true)
            }
            None => {
                drop(doc);
                warn!(%handle, "delete of unknown prim");
                self.queue_log(
                    BridgeLogLevel::Warning,
                    format!("cannot delete {handle}: no such prim"),
                );
                Ok(false)
            }
        }
    }

    fn set_sampler_data(
        &self,
        handle: PrimHandle,
        data: &SamplerData,
        time: TimeCode,
    ) -> BridgeResult<()> {
        self.write_data(handle, PrimData::Sampler(data.clone()), time)
    }

    fn set_spatial_field_data(
        &self,
        handle: PrimHandle,
        data: &SpatialFieldData,
        time: TimeCode,
    ) -> BridgeResult<()> {
        self.write_data(handle, PrimData::SpatialField(data.clone()), time)
    }

    fn set_instance_data(
        &self,
        handle: PrimHandle,
        data: &InstanceData,
        time: TimeCode,
    ) -> BridgeResult<()> {
        self.write_data(handle, PrimData::Instance(data.clone()), time)
    }

    fn set_instance_refs(
        &self,
        world: PrimHandle,
        instances: &[PrimHandle],
        time_varying: bool,
        time: TimeCode,
    ) -> BridgeResult<()> {
        self.record(BridgeCall::SetInstanceRefs {
            world,
            instances: instances.to_vec(),
            time_varying,
            time,
        });

        let mut doc = self.write_document()?;
        for &instance in instances {
            doc.check_kind(instance, PrimKind::Instance)?;
        }
        let prim = doc.prim_mut(world, PrimKind::World)?;
        if time_varying {
            prim.timed_refs.insert(time, instances.to_vec());
        } else {
            prim.refs = instances.to_vec();
        }
        debug!(path = %prim.path, count = instances.len(), time_varying, "set instance refs");
        Ok(())
    }

    fn delete_instance_refs(
        &self,
        world: PrimHandle,
        time_varying: bool,
        time: TimeCode,
    ) -> BridgeResult<()> {
        self.record(BridgeCall::DeleteInstanceRefs {
            world,
            time_varying,
            time,
        });

        let mut doc = self.write_document()?;
        let prim = doc.prim_mut(world, PrimKind::World)?;
        if time_varying {
            prim.timed_refs.insert(time, Vec::new());
        } else {
            prim.refs.clear();
        }
        debug!(path = %prim.path, time_varying, "cleared instance refs");
        Ok(())
    }

    fn save_scene(&self) -> BridgeResult<()> {
        self.record(BridgeCall::SaveScene);
        let mut doc = self.write_document()?;
        doc.save_count += 1;
        let prims = doc.prims.len();
        drop(doc);
        self.queue_log(
            BridgeLogLevel::Status,
            format!("saved scene ({prims} prims)"),
        );
        Ok(())
    }

    fn take_log(&self) -> Vec<BridgeLogEntry> {
        std::mem::take(&mut *self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Serializable view of an [`InMemoryBridge`] document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentSnapshot {
    pub prims: Vec<PrimSnapshot>,
    pub save_count: u64,
}

impl DocumentSnapshot {
    /// Look up a prim by path.
    pub fn prim(&self, path: &str) -> Option<&PrimSnapshot> {
        self.prims.iter().find(|p| p.path == path)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> BridgeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BridgeError::Serialization(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimSnapshot {
    pub path: String,
    pub kind: PrimKind,
    pub attributes: BTreeMap<String, AttributeSnapshot>,
    /// Default reference targets, as prim paths.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timed_refs: Vec<TimedRefs>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttributeSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timed: Vec<TimedValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimedValue {
    pub time: f64,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimedRefs {
    pub time: f64,
    pub targets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;
    use usdb_types::DocumentType;

    use crate::prim::WrapMode;

    fn t(v: f64) -> TimeCode {
        TimeCode::new(v).unwrap()
    }

    fn field_data(n: u64, mask: u32) -> SpatialFieldData {
        SpatialFieldData {
            element_type: DocumentType::Float,
            data: Bytes::from(vec![0u8; n as usize * 4]),
            num_items: n,
            spacing: [1.0; 3],
            origin: [0.0; 3],
            time_varying: mask,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Creation and deletion
    // -----------------------------------------------------------------------

    #[test]
    fn create_is_idempotent_by_path() {
        let bridge = InMemoryBridge::new();
        let first = bridge.create_prim(PrimKind::SpatialField, "density").unwrap();
        assert!(first.is_new);
        let again = bridge.create_prim(PrimKind::SpatialField, "density").unwrap();
        assert!(!again.is_new);
        assert_eq!(first.handle, again.handle);
        assert_eq!(bridge.len(), 1);
        assert_eq!(bridge.create_calls(), 2);

        let log = bridge.take_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].level, BridgeLogLevel::Status);
        assert!(bridge.take_log().is_empty());
    }

    #[test]
    fn same_name_in_different_scopes_is_distinct() {
        let bridge = InMemoryBridge::new();
        let a = bridge.create_prim(PrimKind::Sampler, "x").unwrap();
        let b = bridge.create_prim(PrimKind::Instance, "x").unwrap();
        assert_ne!(a.handle, b.handle);
        assert_eq!(bridge.path_of(a.handle).as_deref(), Some("/samplers/x"));
        assert_eq!(bridge.handle_at("/instances/x"), Some(b.handle));
    }

    #[test]
    fn create_rejects_illegal_names() {
        let bridge = InMemoryBridge::new();
        let err = bridge.create_prim(PrimKind::World, "my world").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidName(_)));
        assert!(bridge.is_empty());
    }

    #[test]
    fn delete_frees_the_path() {
        let bridge = InMemoryBridge::new();
        let p = bridge.create_prim(PrimKind::Instance, "inst").unwrap();
        assert!(bridge.delete_prim(p.handle).unwrap());
        assert!(bridge.is_empty());
        assert!(!bridge.delete_prim(p.handle).unwrap());
        assert_eq!(bridge.take_log()[0].level, BridgeLogLevel::Warning);

        let q = bridge.create_prim(PrimKind::Instance, "inst").unwrap();
        assert!(q.is_new);
        assert_ne!(p.handle, q.handle);
    }

    // -----------------------------------------------------------------------
    // 2. Data writes
    // -----------------------------------------------------------------------

    #[test]
    fn untimed_write_sets_defaults() {
        let bridge = InMemoryBridge::new();
        let p = bridge.create_prim(PrimKind::SpatialField, "f").unwrap();
        bridge
            .set_spatial_field_data(p.handle, &field_data(100, 0), t(0.0))
            .unwrap();

        let snap = bridge.snapshot();
        let prim = snap.prim("/fields/f").unwrap();
        let data = &prim.attributes["data"];
        assert_eq!(data.default.as_ref().unwrap()["count"], json!(100));
        assert!(data.timed.is_empty());
        assert_eq!(bridge.data_writes(), 1);
    }

    #[test]
    fn timed_members_are_recorded_per_time_code() {
        let bridge = InMemoryBridge::new();
        let p = bridge.create_prim(PrimKind::Sampler, "tex").unwrap();
        let mut data = SamplerData {
            file_name: Some("a.png".into()),
            wrap_s: WrapMode::Clamp,
            wrap_t: WrapMode::Clamp,
            time_varying: SamplerData::FILE_NAME,
        };
        bridge.set_sampler_data(p.handle, &data, t(1.0)).unwrap();
        data.file_name = Some("b.png".into());
        bridge.set_sampler_data(p.handle, &data, t(2.0)).unwrap();

        let snap = bridge.snapshot();
        let prim = snap.prim("/samplers/tex").unwrap();
        let file = &prim.attributes["fileName"];
        assert!(file.default.is_none());
        assert_eq!(file.timed.len(), 2);
        assert_eq!(file.timed[1].time, 2.0);
        assert_eq!(file.timed[1].value, json!("b.png"));
        assert_eq!(prim.attributes["wrapS"].default, Some(json!("clamp")));
    }

    #[test]
    fn write_to_wrong_kind_fails() {
        let bridge = InMemoryBridge::new();
        let p = bridge.create_prim(PrimKind::World, "w").unwrap();
        let data = InstanceData {
            transform: [0.0; 16],
            time_varying: 0,
        };
        let err = bridge.set_instance_data(p.handle, &data, t(0.0)).unwrap_err();
        assert!(matches!(err, BridgeError::KindMismatch { .. }));
    }

    #[test]
    fn write_to_unknown_prim_fails() {
        let bridge = InMemoryBridge::new();
        let err = bridge
            .set_spatial_field_data(PrimHandle::from_raw(42), &field_data(1, 0), t(0.0))
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownPrim(_)));
    }

    // -----------------------------------------------------------------------
    // 3. Reference lists
    // -----------------------------------------------------------------------

    #[test]
    fn refs_are_replaced_in_order() {
        let bridge = InMemoryBridge::new();
        let w = bridge.create_prim(PrimKind::World, "world").unwrap().handle;
        let a = bridge.create_prim(PrimKind::Instance, "a").unwrap().handle;
        let b = bridge.create_prim(PrimKind::Instance, "b").unwrap().handle;

        bridge.set_instance_refs(w, &[b, a, b], false, t(0.0)).unwrap();
        let snap = bridge.snapshot();
        assert_eq!(
            snap.prim("/worlds/world").unwrap().refs,
            vec!["/instances/b", "/instances/a", "/instances/b"]
        );

        bridge.set_instance_refs(w, &[a], false, t(0.0)).unwrap();
        assert_eq!(bridge.snapshot().prim("/worlds/world").unwrap().refs, vec!["/instances/a"]);

        bridge.delete_instance_refs(w, false, t(0.0)).unwrap();
        assert!(bridge.snapshot().prim("/worlds/world").unwrap().refs.is_empty());
    }

    #[test]
    fn timed_refs_clear_records_empty_list() {
        let bridge = InMemoryBridge::new();
        let w = bridge.create_prim(PrimKind::World, "world").unwrap().handle;
        let a = bridge.create_prim(PrimKind::Instance, "a").unwrap().handle;

        bridge.set_instance_refs(w, &[a], true, t(1.0)).unwrap();
        bridge.delete_instance_refs(w, true, t(2.0)).unwrap();

        let snap = bridge.snapshot();
        let timed = &snap.prim("/worlds/world").unwrap().timed_refs;
        assert_eq!(timed.len(), 2);
        assert_eq!(timed[0].targets, vec!["/instances/a"]);
        assert!(timed[1].targets.is_empty());
    }

    #[test]
    fn refs_must_point_at_instances() {
        let bridge = InMemoryBridge::new();
        let w = bridge.create_prim(PrimKind::World, "world").unwrap().handle;
        let s = bridge.create_prim(PrimKind::Sampler, "s").unwrap().handle;
        let err = bridge.set_instance_refs(w, &[s], false, t(0.0)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::KindMismatch {
                expected: PrimKind::Instance,
                ..
            }
        ));
    }

    // -----------------------------------------------------------------------
    // 4. Save and snapshot
    // -----------------------------------------------------------------------

    #[test]
    fn save_increments_counter_and_logs() {
        let bridge = InMemoryBridge::new();
        bridge.save_scene().unwrap();
        bridge.save_scene().unwrap();
        assert_eq!(bridge.save_count(), 2);
        assert_eq!(bridge.snapshot().save_count, 2);
        assert_eq!(bridge.take_log().len(), 2);
        assert_eq!(bridge.count_calls(|c| *c == BridgeCall::SaveScene), 2);
    }

    #[test]
    fn snapshot_serializes_sorted_by_path() {
        let bridge = InMemoryBridge::new();
        bridge.create_prim(PrimKind::World, "w").unwrap();
        bridge.create_prim(PrimKind::Sampler, "s").unwrap();
        let snap = bridge.snapshot();
        let paths: Vec<&str> = snap.prims.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/samplers/s", "/worlds/w"]);

        let json = snap.to_json_pretty().unwrap();
        assert!(json.contains("\"kind\": \"sampler\""));
        assert!(json.contains("\"save_count\": 0"));
    }

    #[test]
    fn journal_keeps_arrival_order() {
        let bridge = InMemoryBridge::new();
        let p = bridge.create_prim(PrimKind::Instance, "i").unwrap().handle;
        bridge.save_scene().unwrap();
        bridge.delete_prim(p).unwrap();

        let journal = bridge.journal();
        assert!(matches!(journal[0], BridgeCall::CreatePrim { is_new: true, .. }));
        assert_eq!(journal[1], BridgeCall::SaveScene);
        assert_eq!(journal[2], BridgeCall::DeletePrim { handle: p });
    }
}
