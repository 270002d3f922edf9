//! The device facade.
//!
//! [`Device`] owns the live object set, allocates handles, routes attribute
//! mutations and property queries to objects, drives commits, and turns
//! every error into exactly one report on the status channel.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use usdb_bridge::{BridgeLogLevel, SceneBridge};
use usdb_params::{sanitized, ParamError, ParamValue};
use usdb_types::{DataType, ObjectHandle, PrimHandle, Severity, StatusCode};

use crate::commit::CommitOutcome;
use crate::config::{DeviceConfig, LifetimePolicy};
use crate::error::{CommitError, DeviceError, DeviceResult};
use crate::kinds::{CommitContext, InstanceKind, SamplerKind, SpatialFieldKind, WorldKind};
use crate::object::{BridgedObject, ObjectKind, SetOutcome};
use crate::resolver::{ObjectLookup, ResolvedObject};
use crate::status::{StatusReport, StatusSink};

/// Device-level parameter holding the device time step.
pub const TIME_STEP_PARAM: &str = "usd::timestep";

/// A live object of any kind.
#[derive(Debug)]
pub enum SceneObject {
    Sampler(BridgedObject<SamplerKind>),
    SpatialField(BridgedObject<SpatialFieldKind>),
    Instance(BridgedObject<InstanceKind>),
    World(BridgedObject<WorldKind>),
}

macro_rules! dispatch {
    ($object:expr, $o:ident => $body:expr) => {
        match $object {
            SceneObject::Sampler($o) => $body,
            SceneObject::SpatialField($o) => $body,
            SceneObject::Instance($o) => $body,
            SceneObject::World($o) => $body,
        }
    };
}

impl SceneObject {
    fn new(kind: ObjectKind, handle: ObjectHandle, unique_name: String) -> Self {
        match kind {
            ObjectKind::Sampler => SceneObject::Sampler(BridgedObject::new(handle, unique_name)),
            ObjectKind::SpatialField => {
                SceneObject::SpatialField(BridgedObject::new(handle, unique_name))
            }
            ObjectKind::Instance => SceneObject::Instance(BridgedObject::new(handle, unique_name)),
            ObjectKind::World => SceneObject::World(BridgedObject::new(handle, unique_name)),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        dispatch!(self, o => o.kind())
    }

    pub fn data_type(&self) -> DataType {
        self.kind().data_type()
    }

    pub fn handle(&self) -> ObjectHandle {
        dispatch!(self, o => o.handle())
    }

    /// Persisted name.
    pub fn name(&self) -> &str {
        dispatch!(self, o => o.name())
    }

    /// Caller-chosen name, or the unique name if none was set.
    pub fn display_name(&self) -> &str {
        dispatch!(self, o => o.names().display())
    }

    pub fn prim(&self) -> Option<PrimHandle> {
        dispatch!(self, o => o.prim())
    }

    pub fn is_changed(&self) -> bool {
        dispatch!(self, o => o.is_changed())
    }

    fn set_param(&mut self, name: &str, value: ParamValue) -> Result<SetOutcome, ParamError> {
        dispatch!(self, o => o.set_param(name, value))
    }

    fn reset_param(&mut self, name: &str) -> Result<SetOutcome, ParamError> {
        dispatch!(self, o => o.reset_param(name))
    }

    fn get_property(&self, name: &str, ty: DataType, out: &mut [u8]) -> DeviceResult<bool> {
        dispatch!(self, o => o.get_property(name, ty, out))
    }

    fn commit(&mut self, ctx: &CommitContext<'_>) -> Result<CommitOutcome, CommitError> {
        dispatch!(self, o => o.commit(ctx))
    }

    fn release(&mut self, ctx: &CommitContext<'_>) -> Result<bool, CommitError> {
        dispatch!(self, o => o.release(ctx))
    }
}

struct Registry<'a>(&'a BTreeMap<ObjectHandle, SceneObject>);

impl ObjectLookup for Registry<'_> {
    fn lookup(&self, handle: ObjectHandle) -> Option<ResolvedObject> {
        self.0.get(&handle).map(|o| ResolvedObject {
            data_type: o.data_type(),
            prim: o.prim(),
        })
    }
}

/// The caller-facing entry point.
///
/// Operations run to completion synchronously. Objects are committed in the
/// order the caller asks; a container must be committed after the objects it
/// references.
pub struct Device {
    config: DeviceConfig,
    bridge: Option<Arc<dyn SceneBridge>>,
    sink: Arc<dyn StatusSink>,
    objects: BTreeMap<ObjectHandle, SceneObject>,
    next_handle: u64,
    name_prefix: String,
}

impl Device {
    /// Create a device. Without a bridge every commit is a no-op and objects
    /// are pure in-memory value holders.
    pub fn new(
        config: DeviceConfig,
        bridge: Option<Arc<dyn SceneBridge>>,
        sink: Arc<dyn StatusSink>,
    ) -> DeviceResult<Self> {
        config.validate()?;
        let name_prefix = sanitized(&config.name_prefix);
        Ok(Self {
            config,
            bridge,
            sink,
            objects: BTreeMap::new(),
            next_handle: 0,
            name_prefix,
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if no objects are live.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    /// Live objects in handle order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    // ---- Object lifecycle ----

    /// Create an object with an auto-generated name.
    pub fn new_object(&mut self, kind: ObjectKind) -> ObjectHandle {
        self.next_handle += 1;
        let handle = ObjectHandle::from_raw(self.next_handle);
        let unique = format!("{}{}_{}", self.name_prefix, kind, self.next_handle);
        debug!(%handle, %kind, name = %unique, "new object");
        self.objects
            .insert(handle, SceneObject::new(kind, handle, unique));
        handle
    }

    /// Drop an object. Under [`LifetimePolicy::DeleteOnRelease`] its prim is
    /// deleted too.
    pub fn release(&mut self, handle: ObjectHandle) -> DeviceResult<()> {
        let Some(mut object) = self.objects.remove(&handle) else {
            return self.fail(Some(handle), DataType::Object, DeviceError::UnknownObject(handle));
        };
        let source_type = object.data_type();
        debug!(%handle, object = object.name(), "release");
        if self.config.lifetime != LifetimePolicy::DeleteOnRelease {
            return Ok(());
        }

        let result = {
            let registry = Registry(&self.objects);
            let ctx = CommitContext {
                bridge: self.bridge.as_deref(),
                config: &self.config,
                lookup: &registry,
            };
            object.release(&ctx)
        };
        self.drain_bridge_log(Some(handle), source_type);
        match result {
            Ok(_) => Ok(()),
            Err(e) => self.fail(Some(handle), source_type, e.into()),
        }
    }

    // ---- Attributes ----

    /// Set an attribute on an object.
    ///
    /// Unknown attribute names and the naming-policy fallbacks are reported
    /// as warnings and leave the object untouched. Type mismatches are
    /// errors.
    pub fn set_param(
        &mut self,
        handle: ObjectHandle,
        name: &str,
        value: ParamValue,
    ) -> DeviceResult<()> {
        let Some(object) = self.objects.get_mut(&handle) else {
            return self.fail(Some(handle), DataType::Object, DeviceError::UnknownObject(handle));
        };
        let result = object.set_param(name, value);
        let (object_name, source_type) = (object.name().to_string(), object.data_type());
        self.settle_param(handle, source_type, object_name, result)
    }

    /// Restore an attribute to its default.
    pub fn unset_param(&mut self, handle: ObjectHandle, name: &str) -> DeviceResult<()> {
        let Some(object) = self.objects.get_mut(&handle) else {
            return self.fail(Some(handle), DataType::Object, DeviceError::UnknownObject(handle));
        };
        let result = object.reset_param(name);
        let (object_name, source_type) = (object.name().to_string(), object.data_type());
        self.settle_param(handle, source_type, object_name, result)
    }

    fn settle_param(
        &self,
        handle: ObjectHandle,
        source_type: DataType,
        object: String,
        result: Result<SetOutcome, ParamError>,
    ) -> DeviceResult<()> {
        match result {
            Ok(SetOutcome::Stored) => Ok(()),
            Ok(SetOutcome::Ignored(message)) => {
                self.warn(Some(handle), source_type, message);
                Ok(())
            }
            Err(ParamError::UnknownParam { name, .. }) => {
                self.warn(
                    Some(handle),
                    source_type,
                    format!("'{object}' ignoring unknown parameter '{name}'."),
                );
                Ok(())
            }
            Err(source) => self.fail(
                Some(handle),
                source_type,
                DeviceError::Param { object, source },
            ),
        }
    }

    /// Set a device-level parameter. Only [`TIME_STEP_PARAM`] is recognized.
    pub fn set_device_param(&mut self, name: &str, value: ParamValue) -> DeviceResult<()> {
        match (name, value) {
            (TIME_STEP_PARAM, ParamValue::Float64(t)) => self.set_time_step(t),
            (TIME_STEP_PARAM, other) => self.fail(
                None,
                DataType::Device,
                DeviceError::Param {
                    object: "device".into(),
                    source: ParamError::TypeMismatch {
                        name: name.to_string(),
                        expected: DataType::Float64,
                        actual: other.data_type(),
                    },
                },
            ),
            _ => {
                self.warn(
                    None,
                    DataType::Device,
                    format!("device ignoring unknown parameter '{name}'."),
                );
                Ok(())
            }
        }
    }

    /// Change the device-wide time step.
    pub fn set_time_step(&mut self, time_step: f64) -> DeviceResult<()> {
        if !time_step.is_finite() {
            return self.fail(
                None,
                DataType::Device,
                DeviceError::Config(format!("time step must be finite, got {time_step}")),
            );
        }
        self.config.time_step = time_step;
        Ok(())
    }

    // ---- Commit and queries ----

    /// Commit one object.
    pub fn commit(&mut self, handle: ObjectHandle) -> DeviceResult<CommitOutcome> {
        // Taken out of the map so the rest stays readable for reference
        // resolution while this one is mutated.
        let Some(mut object) = self.objects.remove(&handle) else {
            return self.fail(Some(handle), DataType::Object, DeviceError::UnknownObject(handle));
        };
        let result = {
            let registry = Registry(&self.objects);
            let ctx = CommitContext {
                bridge: self.bridge.as_deref(),
                config: &self.config,
                lookup: &registry,
            };
            object.commit(&ctx)
        };
        let source_type = object.data_type();
        self.objects.insert(handle, object);
        self.drain_bridge_log(Some(handle), source_type);

        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => self.fail(Some(handle), source_type, e.into()),
        }
    }

    /// Query a property into `out`. Returns `false` when the object or the
    /// property does not exist, or when the query fails.
    pub fn get_property(
        &self,
        handle: ObjectHandle,
        name: &str,
        ty: DataType,
        out: &mut [u8],
    ) -> bool {
        let Some(object) = self.objects.get(&handle) else {
            self.report_error(Some(handle), DataType::Object, &DeviceError::UnknownObject(handle));
            return false;
        };
        match object.get_property(name, ty, out) {
            Ok(found) => found,
            Err(e) => {
                self.report_error(Some(handle), object.data_type(), &e);
                false
            }
        }
    }

    /// Persist the whole document now. A no-op without a bridge.
    pub fn save_scene(&self) -> DeviceResult<()> {
        let Some(bridge) = &self.bridge else {
            return Ok(());
        };
        let result = bridge.save_scene();
        self.drain_bridge_log(None, DataType::Device);
        result.or_else(|e| self.fail(None, DataType::Device, e.into()))
    }

    // ---- Status channel ----

    fn report(
        &self,
        source: Option<ObjectHandle>,
        source_type: DataType,
        severity: Severity,
        code: StatusCode,
        message: String,
    ) {
        self.sink
            .report(StatusReport::new(source, source_type, severity, code, message));
    }

    fn warn(&self, source: Option<ObjectHandle>, source_type: DataType, message: String) {
        self.report(source, source_type, Severity::Warning, StatusCode::NoError, message);
    }

    fn fail<T>(
        &self,
        source: Option<ObjectHandle>,
        source_type: DataType,
        err: DeviceError,
    ) -> DeviceResult<T> {
        self.report_error(source, source_type, &err);
        Err(err)
    }

    fn report_error(&self, source: Option<ObjectHandle>, source_type: DataType, err: &DeviceError) {
        self.report(
            source,
            source_type,
            Severity::Error,
            err.status_code(),
            err.to_string(),
        );
    }

    fn drain_bridge_log(&self, source: Option<ObjectHandle>, source_type: DataType) {
        let Some(bridge) = &self.bridge else {
            return;
        };
        for entry in bridge.take_log() {
            let severity = match entry.level {
                BridgeLogLevel::Status => Severity::Info,
                BridgeLogLevel::Warning => Severity::Warning,
                BridgeLogLevel::Error => Severity::Error,
            };
            self.report(source, source_type, severity, StatusCode::NoError, entry.message);
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("config", &self.config)
            .field("has_bridge", &self.bridge.is_some())
            .field("objects", &self.objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usdb_bridge::{BridgeCall, InMemoryBridge};
    use usdb_params::{DataArray, DataLayout};

    use crate::status::RecordingSink;

    struct Fixture {
        device: Device,
        bridge: Arc<InMemoryBridge>,
        sink: Arc<RecordingSink>,
    }

    fn fixture_with(config: DeviceConfig) -> Fixture {
        let bridge = Arc::new(InMemoryBridge::new());
        let sink = Arc::new(RecordingSink::new());
        let device = Device::new(
            config,
            Some(bridge.clone() as Arc<dyn SceneBridge>),
            sink.clone() as Arc<dyn StatusSink>,
        )
        .unwrap();
        Fixture {
            device,
            bridge,
            sink,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(DeviceConfig::default())
    }

    fn floats(n: usize) -> ParamValue {
        DataArray::from_values(&vec![1.5f32; n]).into()
    }

    fn instance_array(handles: Vec<ObjectHandle>) -> ParamValue {
        DataArray::from_handles(DataType::Instance, handles).unwrap().into()
    }

    // -----------------------------------------------------------------------
    // 1. End-to-end field scenario
    // -----------------------------------------------------------------------

    #[test]
    fn field_scenario() {
        let mut f = fixture();
        let field = f.device.new_object(ObjectKind::SpatialField);

        f.device.set_param(field, "name", "".into()).unwrap();
        assert_eq!(f.sink.warnings().len(), 1);
        assert_eq!(f.sink.warnings()[0].code, StatusCode::NoError);
        assert!(f.sink.errors().is_empty());
        assert_eq!(f.device.object(field).unwrap().name(), "spatial_field_1");

        f.device.set_param(field, "data", floats(100)).unwrap();
        let outcome = f.device.commit(field).unwrap();
        assert_eq!(outcome, CommitOutcome::Written { created: true });
        assert_eq!(f.bridge.create_calls(), 1);
        assert_eq!(f.bridge.data_writes(), 1);
        assert!(!f.device.object(field).unwrap().is_changed());

        assert_eq!(f.device.commit(field).unwrap(), CommitOutcome::Unchanged);
        assert_eq!(f.bridge.data_writes(), 1);

        let grid = DataArray::from_values(&[0.0f32; 100])
            .with_layout(DataLayout::two_dimensional(10, 10))
            .unwrap();
        f.device.set_param(field, "data", grid.into()).unwrap();
        assert!(f.device.commit(field).is_err());
        let errors = f.sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, StatusCode::InvalidArgument);
        assert_eq!(errors[0].source, Some(field));
        assert_eq!(errors[0].source_type, DataType::SpatialField);
        assert!(errors[0].message.contains("'spatial_field_1'"));
        assert!(errors[0].message.contains("'data'"));
        assert_eq!(f.bridge.data_writes(), 1);
    }

    #[test]
    fn missing_data_reports_invalid_operation_once() {
        let mut f = fixture();
        let field = f.device.new_object(ObjectKind::SpatialField);
        let err = f.device.commit(field).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidOperation);
        assert_eq!(f.sink.errors().len(), 1);
        assert!(f.bridge.is_empty());
    }

    // -----------------------------------------------------------------------
    // 2. Attributes and names
    // -----------------------------------------------------------------------

    #[test]
    fn named_object_persists_under_sanitized_name() {
        let mut f = fixture();
        let sampler = f.device.new_object(ObjectKind::Sampler);
        f.device.set_param(sampler, "name", "wood grain.png".into()).unwrap();
        f.device.set_param(sampler, "filename", "wood.png".into()).unwrap();
        f.device.set_param(sampler, "wrapMode1", "repeat".into()).unwrap();
        f.device.commit(sampler).unwrap();

        let snap = f.bridge.snapshot();
        let prim = snap.prim("/samplers/wood_grain_png").unwrap();
        assert_eq!(prim.attributes["wrapS"].default, Some(serde_json::json!("repeat")));
        assert_eq!(prim.attributes["wrapT"].default, Some(serde_json::json!("black")));
        assert_eq!(
            f.device.object(sampler).unwrap().display_name(),
            "wood grain.png"
        );
    }

    #[test]
    fn unknown_param_is_a_warning() {
        let mut f = fixture();
        let world = f.device.new_object(ObjectKind::World);
        f.device.set_param(world, "background", "red".into()).unwrap();
        let warnings = f.sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'background'"));
        assert!(!f.device.object(world).unwrap().is_changed());
    }

    #[test]
    fn type_mismatch_is_an_invalid_argument() {
        let mut f = fixture();
        let inst = f.device.new_object(ObjectKind::Instance);
        let err = f
            .device
            .set_param(inst, "transform", [1.0f32, 2.0, 3.0].into())
            .unwrap_err();
        assert!(matches!(err, DeviceError::Param { .. }));
        assert_eq!(f.sink.errors()[0].code, StatusCode::InvalidArgument);
    }

    #[test]
    fn writing_usd_name_is_a_warning() {
        let mut f = fixture();
        let world = f.device.new_object(ObjectKind::World);
        f.device.set_param(world, "usd::name", "root".into()).unwrap();
        assert_eq!(f.sink.warnings().len(), 1);
        assert_eq!(f.device.object(world).unwrap().name(), "world_1");
    }

    #[test]
    fn unknown_handle_is_reported() {
        let mut f = fixture();
        let ghost = ObjectHandle::from_raw(77);
        assert!(matches!(
            f.device.commit(ghost),
            Err(DeviceError::UnknownObject(_))
        ));
        assert!(f.device.set_param(ghost, "name", "x".into()).is_err());
        assert_eq!(f.sink.errors().len(), 2);
    }

    #[test]
    fn name_prefix_applies_to_fallback_names() {
        let mut f = fixture_with(DeviceConfig {
            name_prefix: "scan-".into(),
            ..Default::default()
        });
        let world = f.device.new_object(ObjectKind::World);
        assert_eq!(f.device.object(world).unwrap().name(), "scan_world_1");
    }

    // -----------------------------------------------------------------------
    // 3. Property queries
    // -----------------------------------------------------------------------

    #[test]
    fn name_size_query() {
        let mut f = fixture();
        let world = f.device.new_object(ObjectKind::World);
        let mut buf = [0u8; 8];
        assert!(f.device.get_property(world, "usd::name.size", DataType::UInt64, &mut buf));
        assert_eq!(u64::from_ne_bytes(buf), "world_1".len() as u64);

        let mut wrong = [0u8; 4];
        assert!(!f.device.get_property(world, "usd::name.size", DataType::UInt64, &mut wrong));
        assert_eq!(wrong, [0u8; 4]);
        assert_eq!(f.sink.errors().len(), 1);
        assert_eq!(f.sink.errors()[0].code, StatusCode::InvalidArgument);
    }

    #[test]
    fn name_string_query() {
        let mut f = fixture();
        let world = f.device.new_object(ObjectKind::World);
        f.device.set_param(world, "name", "main".into()).unwrap();
        let mut buf = [0u8; 32];
        assert!(f.device.get_property(world, "usd::name", DataType::String, &mut buf));
        assert_eq!(&buf[..5], b"main\0");
        assert!(!f.device.get_property(world, "name", DataType::String, &mut buf));
    }

    #[test]
    fn query_on_unknown_handle_reports_once() {
        let f = fixture();
        let ghost = ObjectHandle::from_raw(42);
        let mut buf = [0u8; 8];
        assert!(!f.device.get_property(ghost, "usd::name.size", DataType::UInt64, &mut buf));
        assert_eq!(buf, [0u8; 8]);
        let errors = f.sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].source, Some(ghost));
        assert_eq!(errors[0].source_type, DataType::Object);
    }

    // -----------------------------------------------------------------------
    // 4. Worlds and references
    // -----------------------------------------------------------------------

    #[test]
    fn world_references_committed_instances_in_order() {
        let mut f = fixture();
        let a = f.device.new_object(ObjectKind::Instance);
        let b = f.device.new_object(ObjectKind::Instance);
        let world = f.device.new_object(ObjectKind::World);
        f.device.commit(a).unwrap();
        f.device.commit(b).unwrap();

        f.device
            .set_param(world, "instance", instance_array(vec![b, a]))
            .unwrap();
        f.device.commit(world).unwrap();

        let snap = f.bridge.snapshot();
        assert_eq!(
            snap.prim("/worlds/world_3").unwrap().refs,
            vec!["/instances/instance_2", "/instances/instance_1"]
        );
        assert_eq!(f.bridge.save_count(), 1);
    }

    #[test]
    fn world_without_instances_clears_refs() {
        let mut f = fixture();
        let inst = f.device.new_object(ObjectKind::Instance);
        let world = f.device.new_object(ObjectKind::World);
        f.device.commit(inst).unwrap();
        f.device
            .set_param(world, "instance", instance_array(vec![inst]))
            .unwrap();
        f.device.commit(world).unwrap();

        f.device.unset_param(world, "instance").unwrap();
        f.device.commit(world).unwrap();
        assert!(f.bridge.snapshot().prim("/worlds/world_2").unwrap().refs.is_empty());

        f.device
            .set_param(world, "instance", instance_array(vec![]))
            .unwrap();
        f.device.commit(world).unwrap();
        assert_eq!(
            f.bridge
                .count_calls(|c| matches!(c, BridgeCall::SetInstanceRefs { .. })),
            1
        );
        assert_eq!(
            f.bridge
                .count_calls(|c| matches!(c, BridgeCall::DeleteInstanceRefs { .. })),
            2
        );
    }

    #[test]
    fn uncommitted_instance_aborts_world_commit() {
        let mut f = fixture();
        let inst = f.device.new_object(ObjectKind::Instance);
        let world = f.device.new_object(ObjectKind::World);
        f.device
            .set_param(world, "instance", instance_array(vec![inst]))
            .unwrap();

        let err = f.device.commit(world).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidOperation);
        assert_eq!(f.sink.errors().len(), 1);
        assert!(f.bridge.is_empty());
        assert_eq!(f.bridge.save_count(), 0);

        f.device.commit(inst).unwrap();
        f.device.commit(world).unwrap();
        assert_eq!(f.bridge.save_count(), 1);
    }

    #[test]
    fn wrong_element_type_is_rejected() {
        let mut f = fixture();
        let sampler = f.device.new_object(ObjectKind::Sampler);
        let world = f.device.new_object(ObjectKind::World);
        f.device.commit(sampler).unwrap();
        let samplers = DataArray::from_handles(DataType::Sampler, vec![sampler]).unwrap();
        f.device.set_param(world, "instance", samplers.into()).unwrap();

        let err = f.device.commit(world).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidArgument);
        assert_eq!(
            f.bridge
                .count_calls(|c| matches!(c, BridgeCall::SetInstanceRefs { .. })),
            0
        );
    }

    #[test]
    fn world_refs_use_device_time_step() {
        let mut f = fixture();
        let inst = f.device.new_object(ObjectKind::Instance);
        let world = f.device.new_object(ObjectKind::World);
        f.device.commit(inst).unwrap();
        f.device
            .set_device_param(TIME_STEP_PARAM, ParamValue::Float64(4.0))
            .unwrap();
        f.device
            .set_param(world, "usd::timevarying", ParamValue::Int32(1))
            .unwrap();
        f.device
            .set_param(world, "instance", instance_array(vec![inst]))
            .unwrap();
        f.device.commit(world).unwrap();

        let snap = f.bridge.snapshot();
        let timed = &snap.prim("/worlds/world_2").unwrap().timed_refs;
        assert_eq!(timed.len(), 1);
        assert_eq!(timed[0].time, 4.0);
    }

    #[test]
    fn world_saves_even_without_changes() {
        let mut f = fixture();
        let world = f.device.new_object(ObjectKind::World);
        f.device.commit(world).unwrap();
        f.device.commit(world).unwrap();
        assert_eq!(f.bridge.save_count(), 2);
        // Each save is forwarded from the bridge log as an info report.
        assert!(f.sink.with_severity(Severity::Info).len() >= 2);
    }

    // -----------------------------------------------------------------------
    // 5. Device parameters, release, save
    // -----------------------------------------------------------------------

    #[test]
    fn device_time_step_validation() {
        let mut f = fixture();
        assert!(f.device.set_time_step(f64::NAN).is_err());
        assert!(f
            .device
            .set_device_param(TIME_STEP_PARAM, ParamValue::Int32(3))
            .is_err());
        assert_eq!(f.sink.errors().len(), 2);
        f.device.set_device_param("usd::output", "x".into()).unwrap();
        assert_eq!(f.sink.warnings().len(), 1);
        assert_eq!(f.device.config().time_step, 0.0);
    }

    #[test]
    fn release_keeps_prim_by_default() {
        let mut f = fixture();
        let inst = f.device.new_object(ObjectKind::Instance);
        f.device.commit(inst).unwrap();
        f.device.release(inst).unwrap();
        assert!(f.device.is_empty());
        assert_eq!(f.bridge.len(), 1);
        assert!(f.device.release(inst).is_err());
    }

    #[test]
    fn delete_on_release_removes_prims() {
        let mut f = fixture_with(DeviceConfig {
            lifetime: LifetimePolicy::DeleteOnRelease,
            ..Default::default()
        });
        let inst = f.device.new_object(ObjectKind::Instance);
        let world = f.device.new_object(ObjectKind::World);
        f.device.commit(inst).unwrap();
        f.device
            .set_param(world, "instance", instance_array(vec![inst]))
            .unwrap();
        f.device.commit(world).unwrap();

        f.device.release(world).unwrap();
        f.device.release(inst).unwrap();
        assert!(f.bridge.is_empty());
        let journal = f.bridge.journal();
        let n = journal.len();
        assert!(matches!(journal[n - 3], BridgeCall::DeleteInstanceRefs { .. }));
        assert!(matches!(journal[n - 2], BridgeCall::DeletePrim { .. }));
    }

    #[test]
    fn explicit_save() {
        let mut f = fixture_with(DeviceConfig {
            save_policy: crate::config::SavePolicy::Explicit,
            ..Default::default()
        });
        let world = f.device.new_object(ObjectKind::World);
        f.device.commit(world).unwrap();
        assert_eq!(f.bridge.save_count(), 0);
        f.device.save_scene().unwrap();
        assert_eq!(f.bridge.save_count(), 1);
    }

    #[test]
    fn detached_device_holds_values_only() {
        let sink = Arc::new(RecordingSink::new());
        let mut device = Device::new(DeviceConfig::default(), None, sink.clone()).unwrap();
        let field = device.new_object(ObjectKind::SpatialField);
        device.set_param(field, "data", floats(3)).unwrap();
        assert_eq!(device.commit(field).unwrap(), CommitOutcome::Detached);
        assert!(device.object(field).unwrap().is_changed());
        device.save_scene().unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Device::new(
            DeviceConfig {
                time_step: f64::INFINITY,
                ..Default::default()
            },
            None,
            Arc::new(RecordingSink::new()),
        )
        .unwrap_err();
        assert!(matches!(err, DeviceError::Config(_)));
    }
}
