use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};

/// What happens to a persisted prim when its in-memory object is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifetimePolicy {
    /// The prim outlives the object.
    #[default]
    Independent,
    /// Releasing the object deletes its prim.
    DeleteOnRelease,
}

/// When the whole scene document is saved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// At the end of every world commit that was not aborted.
    #[default]
    EveryWorldCommit,
    /// Only on an explicit [`Device::save_scene`](crate::Device::save_scene).
    Explicit,
}

/// Configuration of a [`Device`](crate::Device).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub lifetime: LifetimePolicy,
    pub save_policy: SavePolicy,
    /// Device-wide time coordinate, used for world reference lists.
    pub time_step: f64,
    /// Prepended to every auto-generated object name.
    pub name_prefix: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            lifetime: LifetimePolicy::Independent,
            save_policy: SavePolicy::EveryWorldCommit,
            time_step: 0.0,
            name_prefix: String::new(),
        }
    }
}

impl DeviceConfig {
    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> DeviceResult<()> {
        if !self.time_step.is_finite() {
            return Err(DeviceError::Config(format!(
                "time_step must be finite, got {}",
                self.time_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.lifetime, LifetimePolicy::Independent);
        assert_eq!(config.save_policy, SavePolicy::EveryWorldCommit);
        assert_eq!(config.time_step, 0.0);
        assert!(config.name_prefix.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: DeviceConfig = toml::from_str(
            r#"
            lifetime = "delete_on_release"
            time_step = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(config.lifetime, LifetimePolicy::DeleteOnRelease);
        assert_eq!(config.save_policy, SavePolicy::EveryWorldCommit);
        assert_eq!(config.time_step, 2.5);
    }

    #[test]
    fn non_finite_time_step_is_rejected() {
        let config = DeviceConfig {
            time_step: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DeviceError::Config(_))));
    }
}
