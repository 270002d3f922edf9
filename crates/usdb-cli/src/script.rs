//! Scene scripts: a JSON list of object calls replayed against a [`Device`].

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use tracing::debug;
use usdb_bridge::{DocumentSnapshot, InMemoryBridge, SceneBridge};
use usdb_device::object::USD_NAME_SIZE_PROPERTY;
use usdb_device::{
    CommitOutcome, Device, DeviceConfig, ObjectKind, RecordingSink, StatusReport, StatusSink,
};
use usdb_params::{ArrayElement, DataArray, DataLayout, ParamValue};
use usdb_types::{DataType, ObjectHandle, Severity};

/// A parsed script.
#[derive(Debug, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("parsing scene script")
    }
}

/// One call against the device. Objects are named by script-local ids.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    New { kind: ObjectKind, id: String },
    Set { object: String, name: String, value: ScriptValue },
    Unset { object: String, name: String },
    Commit { object: String },
    Release { object: String },
    Device { name: String, value: ScriptValue },
    Save,
    Property { object: String, name: String },
}

impl Step {
    fn op(&self) -> &'static str {
        match self {
            Step::New { .. } => "new",
            Step::Set { .. } => "set",
            Step::Unset { .. } => "unset",
            Step::Commit { .. } => "commit",
            Step::Release { .. } => "release",
            Step::Device { .. } => "device",
            Step::Save => "save",
            Step::Property { .. } => "property",
        }
    }
}

/// Attribute value as written in a script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptValue {
    String(String),
    Int32(i32),
    Uint32(u32),
    Float32(f32),
    Float64(f64),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
    Array(ArraySpec),
    Objects(ObjectArraySpec),
}

/// A numeric array. `type` is a data type name, with or without the
/// `ANARI_` prefix.
#[derive(Debug, Deserialize)]
pub struct ArraySpec {
    #[serde(rename = "type")]
    pub element_type: String,
    pub values: Vec<f64>,
    /// Per-axis item counts. Defaults to one axis over all values.
    #[serde(default)]
    pub dims: Option<Vec<u64>>,
    #[serde(default)]
    pub strides: Option<[i64; 3]>,
}

/// An array of object references.
#[derive(Debug, Deserialize)]
pub struct ObjectArraySpec {
    #[serde(rename = "type")]
    pub element_type: String,
    pub refs: Vec<String>,
}

/// What happened at one step.
#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Everything a run produced.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub steps: Vec<StepOutcome>,
    pub statuses: Vec<StatusReport>,
    /// `None` when the run had no bridge attached.
    pub document: Option<DocumentSnapshot>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| s.severity == Severity::Error)
            .count()
    }
}

/// A device wired to an in-memory bridge and a recording status sink.
pub struct Session {
    device: Device,
    bridge: Option<Arc<InMemoryBridge>>,
    sink: Arc<RecordingSink>,
    ids: HashMap<String, ObjectHandle>,
}

impl Session {
    pub fn new(config: DeviceConfig, with_bridge: bool) -> anyhow::Result<Self> {
        let bridge = with_bridge.then(|| Arc::new(InMemoryBridge::new()));
        let backend = bridge.clone().map(|b| b as Arc<dyn SceneBridge>);
        let sink = Arc::new(RecordingSink::new());
        let device = Device::new(config, backend, sink.clone() as Arc<dyn StatusSink>)?;
        Ok(Self {
            device,
            bridge,
            sink,
            ids: HashMap::new(),
        })
    }

    /// Replay every step. Device failures are recorded and the run goes on;
    /// malformed steps (unknown ids, bad arrays) abort it.
    pub fn run(mut self, script: &Script) -> anyhow::Result<RunReport> {
        let mut steps = Vec::with_capacity(script.steps.len());
        for (index, step) in script.steps.iter().enumerate() {
            let before = self.sink.errors().len();
            let detail = self
                .apply(step)
                .with_context(|| format!("step {index} ({})", step.op()))?;
            let ok = self.sink.errors().len() == before;
            debug!(index, op = step.op(), ok, "step");
            steps.push(StepOutcome {
                index,
                op: step.op(),
                ok,
                detail,
            });
        }
        Ok(RunReport {
            steps,
            statuses: self.sink.reports(),
            document: self.bridge.as_ref().map(|b| b.snapshot()),
        })
    }

    fn apply(&mut self, step: &Step) -> anyhow::Result<String> {
        let detail = match step {
            Step::New { kind, id } => {
                if self.ids.contains_key(id) {
                    bail!("object id '{id}' is already in use");
                }
                let handle = self.device.new_object(*kind);
                self.ids.insert(id.clone(), handle);
                format!("{id} = {kind} {handle}")
            }
            Step::Set { object, name, value } => {
                let handle = self.handle(object)?;
                let value = self.param_value(value)?;
                outcome(self.device.set_param(handle, name, value), || format!("{object}.{name}"))
            }
            Step::Unset { object, name } => {
                let handle = self.handle(object)?;
                outcome(self.device.unset_param(handle, name), || format!("{object}.{name} reset"))
            }
            Step::Commit { object } => {
                let handle = self.handle(object)?;
                match self.device.commit(handle) {
                    Ok(CommitOutcome::Detached) => format!("{object} detached"),
                    Ok(CommitOutcome::Unchanged) => format!("{object} unchanged"),
                    Ok(CommitOutcome::Written { created: true }) => format!("{object} created"),
                    Ok(CommitOutcome::Written { created: false }) => format!("{object} updated"),
                    Err(e) => e.to_string(),
                }
            }
            Step::Release { object } => {
                // The id stays mapped so later steps can refer to the dead
                // handle.
                let handle = self.handle(object)?;
                outcome(self.device.release(handle), || format!("{object} released"))
            }
            Step::Device { name, value } => {
                let value = self.param_value(value)?;
                outcome(self.device.set_device_param(name, value), || format!("device.{name}"))
            }
            Step::Save => outcome(self.device.save_scene(), || "saved".to_string()),
            Step::Property { object, name } => {
                let handle = self.handle(object)?;
                self.query_property(handle, name)
            }
        };
        Ok(detail)
    }

    fn handle(&self, id: &str) -> anyhow::Result<ObjectHandle> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| anyhow!("unknown object id '{id}'"))
    }

    fn param_value(&self, value: &ScriptValue) -> anyhow::Result<ParamValue> {
        Ok(match value {
            ScriptValue::String(s) => ParamValue::String(s.clone()),
            ScriptValue::Int32(v) => ParamValue::Int32(*v),
            ScriptValue::Uint32(v) => ParamValue::UInt32(*v),
            ScriptValue::Float32(v) => ParamValue::Float32(*v),
            ScriptValue::Float64(v) => ParamValue::Float64(*v),
            ScriptValue::Vec3(v) => ParamValue::Float32Vec3(*v),
            ScriptValue::Mat4(v) => ParamValue::Float32Mat4(*v),
            ScriptValue::Array(spec) => ParamValue::array(build_array(spec)?),
            ScriptValue::Objects(spec) => {
                let ty = parse_type(&spec.element_type)?;
                let handles = spec
                    .refs
                    .iter()
                    .map(|id| self.handle(id))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                ParamValue::array(DataArray::from_handles(ty, handles)?)
            }
        })
    }

    fn query_property(&self, handle: ObjectHandle, name: &str) -> String {
        let mut size = [0u8; 8];
        if name == USD_NAME_SIZE_PROPERTY {
            if !self.device.get_property(handle, name, DataType::UInt64, &mut size) {
                return format!("{name} not found");
            }
            return format!("{name} = {}", u64::from_ne_bytes(size));
        }

        let len = if self.device.get_property(
            handle,
            USD_NAME_SIZE_PROPERTY,
            DataType::UInt64,
            &mut size,
        ) {
            u64::from_ne_bytes(size) as usize
        } else {
            255
        };
        let mut buf = vec![0u8; len + 1];
        if !self.device.get_property(handle, name, DataType::String, &mut buf) {
            return format!("{name} not found");
        }
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        format!("{name} = {}", String::from_utf8_lossy(&buf[..end]))
    }
}

fn outcome<E: std::fmt::Display>(result: Result<(), E>, ok: impl FnOnce() -> String) -> String {
    match result {
        Ok(()) => ok(),
        Err(e) => e.to_string(),
    }
}

fn parse_type(name: &str) -> anyhow::Result<DataType> {
    DataType::from_name(name).ok_or_else(|| anyhow!("unknown data type '{name}'"))
}

fn pack<T: ArrayElement>(values: &[f64], convert: impl Fn(f64) -> T) -> DataArray {
    let converted: Vec<T> = values.iter().map(|&v| convert(v)).collect();
    DataArray::from_values(&converted)
}

fn build_array(spec: &ArraySpec) -> anyhow::Result<DataArray> {
    let ty = parse_type(&spec.element_type)?;
    let v = &spec.values;
    let array = match ty {
        DataType::Int8 => pack(v, |x| x as i8),
        DataType::UInt8 => pack(v, |x| x as u8),
        DataType::Int16 => pack(v, |x| x as i16),
        DataType::UInt16 => pack(v, |x| x as u16),
        DataType::Int32 => pack(v, |x| x as i32),
        DataType::UInt32 => pack(v, |x| x as u32),
        DataType::Int64 => pack(v, |x| x as i64),
        DataType::UInt64 => pack(v, |x| x as u64),
        DataType::Float32 => pack(v, |x| x as f32),
        DataType::Float64 => pack(v, |x| x),
        other => bail!("arrays of {other} cannot be written in a script"),
    };

    let mut layout = match spec.dims.as_deref() {
        None => *array.layout(),
        Some([n]) => DataLayout::one_dimensional(*n),
        Some([n1, n2]) => DataLayout::two_dimensional(*n1, *n2),
        Some([n1, n2, n3]) => DataLayout::three_dimensional(*n1, *n2, *n3),
        Some(dims) => bail!("arrays have 1 to 3 dimensions, got {}", dims.len()),
    };
    let Some(items) = layout.checked_total_items() else {
        bail!("array dims {:?} overflow the item count", layout.num_items);
    };
    if items != v.len() as u64 {
        bail!("array dims cover {items} items but {} values were given", v.len());
    }
    if let Some(strides) = spec.strides {
        layout = layout.with_strides(strides);
    }
    Ok(array.with_layout(layout)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use usdb_types::StatusCode;

    fn run(config: DeviceConfig, json: &str) -> RunReport {
        let script = Script::from_json(json).unwrap();
        Session::new(config, true).unwrap().run(&script).unwrap()
    }

    // ----------------------------------------------------------------
    // 1. Parsing
    // ----------------------------------------------------------------

    #[test]
    fn parses_every_op() {
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "new", "kind": "sampler", "id": "s"},
                {"op": "set", "object": "s", "name": "filename", "value": {"string": "a.png"}},
                {"op": "unset", "object": "s", "name": "filename"},
                {"op": "commit", "object": "s"},
                {"op": "release", "object": "s"},
                {"op": "device", "name": "usd::timestep", "value": {"float64": 1.0}},
                {"op": "save"},
                {"op": "property", "object": "s", "name": "usd::name"}
            ]}"#,
        )
        .unwrap();
        let ops: Vec<_> = script.steps.iter().map(Step::op).collect();
        assert_eq!(
            ops,
            ["new", "set", "unset", "commit", "release", "device", "save", "property"]
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = Script::from_json(r#"{"steps": [{"op": "new", "kind": "camera", "id": "c"}]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn empty_script_runs() {
        let report = run(DeviceConfig::default(), "{}");
        assert!(report.steps.is_empty());
        assert_eq!(report.document.unwrap().prims.len(), 0);
    }

    // ----------------------------------------------------------------
    // 2. Arrays
    // ----------------------------------------------------------------

    #[test]
    fn builds_shaped_arrays() {
        let spec = ArraySpec {
            element_type: "FLOAT32".into(),
            values: vec![0.0; 8],
            dims: Some(vec![2, 2, 2]),
            strides: None,
        };
        let array = build_array(&spec).unwrap();
        assert_eq!(array.element_type(), DataType::Float32);
        assert_eq!(array.array_type(), DataType::Array3D);
        assert_eq!(array.bytes().unwrap().len(), 32);
    }

    #[test]
    fn array_dims_must_match_values() {
        let spec = ArraySpec {
            element_type: "ANARI_UINT8".into(),
            values: vec![1.0, 2.0, 3.0],
            dims: Some(vec![2, 2]),
            strides: None,
        };
        assert!(build_array(&spec).is_err());
    }

    #[test]
    fn array_dims_that_overflow_are_rejected() {
        let spec = ArraySpec {
            element_type: "FLOAT32".into(),
            values: vec![0.0; 4],
            dims: Some(vec![1 << 32, 1 << 32]),
            strides: None,
        };
        let err = build_array(&spec).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn array_rejects_vector_elements() {
        let spec = ArraySpec {
            element_type: "FLOAT32_VEC3".into(),
            values: vec![0.0; 3],
            dims: None,
            strides: None,
        };
        assert!(build_array(&spec).is_err());
    }

    // ----------------------------------------------------------------
    // 3. Runs
    // ----------------------------------------------------------------

    #[test]
    fn field_instance_world_scene() {
        let report = run(
            DeviceConfig::default(),
            r#"{"steps": [
                {"op": "new", "kind": "spatial_field", "id": "f"},
                {"op": "set", "object": "f", "name": "name", "value": {"string": "density grid"}},
                {"op": "set", "object": "f", "name": "data",
                 "value": {"array": {"type": "FLOAT32", "values": [0, 1, 2, 3]}}},
                {"op": "commit", "object": "f"},
                {"op": "new", "kind": "instance", "id": "i"},
                {"op": "commit", "object": "i"},
                {"op": "new", "kind": "world", "id": "w"},
                {"op": "set", "object": "w", "name": "instance",
                 "value": {"objects": {"type": "INSTANCE", "refs": ["i"]}}},
                {"op": "commit", "object": "w"},
                {"op": "property", "object": "f", "name": "usd::name"}
            ]}"#,
        );
        assert!(report.steps.iter().all(|s| s.ok), "{:?}", report.steps);
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.steps[3].detail, "f created");
        assert_eq!(report.steps[9].detail, "usd::name = density_grid");

        let doc = report.document.unwrap();
        assert_eq!(doc.save_count, 1);
        assert!(doc.prim("/fields/density_grid").is_some());
        let world = doc.prim("/worlds/world_3").unwrap();
        assert_eq!(world.refs, vec!["/instances/instance_2".to_string()]);
    }

    #[test]
    fn failures_are_reported_and_the_run_continues() {
        let report = run(
            DeviceConfig::default(),
            r#"{"steps": [
                {"op": "new", "kind": "spatial_field", "id": "f"},
                {"op": "commit", "object": "f"},
                {"op": "set", "object": "f", "name": "bogus", "value": {"int32": 1}},
                {"op": "new", "kind": "sampler", "id": "s"},
                {"op": "commit", "object": "s"}
            ]}"#,
        );
        assert!(!report.steps[1].ok);
        assert!(report.steps[2].ok);
        assert!(report.steps[4].ok);
        assert_eq!(report.error_count(), 1);
        let error = report
            .statuses
            .iter()
            .find(|s| s.severity == Severity::Error)
            .unwrap();
        assert_eq!(error.code, StatusCode::InvalidOperation);
        assert!(report
            .statuses
            .iter()
            .any(|s| s.severity == Severity::Warning && s.message.contains("bogus")));
    }

    #[test]
    fn released_ids_stay_addressable() {
        let report = run(
            DeviceConfig::default(),
            r#"{"steps": [
                {"op": "new", "kind": "instance", "id": "i"},
                {"op": "release", "object": "i"},
                {"op": "commit", "object": "i"}
            ]}"#,
        );
        assert!(report.steps[1].ok);
        assert!(!report.steps[2].ok);
    }

    #[test]
    fn unknown_id_aborts_the_run() {
        let script =
            Script::from_json(r#"{"steps": [{"op": "commit", "object": "ghost"}]}"#).unwrap();
        let err = Session::new(DeviceConfig::default(), true)
            .unwrap()
            .run(&script)
            .unwrap_err();
        assert!(format!("{err:#}").contains("ghost"));
    }

    #[test]
    fn duplicate_id_aborts_the_run() {
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "new", "kind": "world", "id": "w"},
                {"op": "new", "kind": "world", "id": "w"}
            ]}"#,
        )
        .unwrap();
        assert!(Session::new(DeviceConfig::default(), true)
            .unwrap()
            .run(&script)
            .is_err());
    }

    #[test]
    fn detached_run_has_no_document() {
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "new", "kind": "sampler", "id": "s"},
                {"op": "commit", "object": "s"}
            ]}"#,
        )
        .unwrap();
        let report = Session::new(DeviceConfig::default(), false)
            .unwrap()
            .run(&script)
            .unwrap();
        assert_eq!(report.steps[1].detail, "s detached");
        assert!(report.document.is_none());
    }

    #[test]
    fn name_prefix_applies_to_generated_names() {
        let config = DeviceConfig {
            name_prefix: "shot 7/".into(),
            ..DeviceConfig::default()
        };
        let report = run(
            config,
            r#"{"steps": [
                {"op": "new", "kind": "sampler", "id": "s"},
                {"op": "property", "object": "s", "name": "usd::name"},
                {"op": "property", "object": "s", "name": "usd::name.size"}
            ]}"#,
        );
        assert_eq!(report.steps[1].detail, "usd::name = shot_7_sampler_1");
        assert_eq!(report.steps[2].detail, "usd::name.size = 16");
    }
}
