use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use metascreen_interpret::{GroupingPolicy, RiskMargin};

use crate::error::ConfigError;

/// Current config version. Each bump needs a step in [`migrate`].
pub const CURRENT_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Risk zone width as a fraction of the reference band width.
    #[serde(default = "default_risk_margin")]
    pub risk_margin: f64,
    /// Reference table TSV. Built-in table when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardio_model_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oncology_model_path: Option<PathBuf>,
    #[serde(default)]
    pub panels: GroupingPolicy,
}

fn default_risk_margin() -> f64 {
    RiskMargin::DEFAULT.fraction()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            risk_margin: default_risk_margin(),
            reference_path: None,
            cardio_model_path: None,
            oncology_model_path: None,
            panels: GroupingPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        tracing::info!(path = %path.display(), version = config.config_version, "config loaded");
        Ok(config)
    }

    /// Parse, migrate to [`CURRENT_VERSION`] and validate.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        // Raw JSON first so migrations can run before deserializing.
        let json: Value = serde_json::from_str(contents)?;
        let on_disk_version = match json.get("config_version") {
            None => 0,
            Some(raw) => raw
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| ConfigError::InvalidVersion(raw.to_string()))?,
        };

        let migrated = migrate(json, on_disk_version)?;
        let config: EngineConfig = serde_json::from_value(migrated)?;
        config.risk_margin()?;
        Ok(config)
    }

    pub fn risk_margin(&self) -> Result<RiskMargin, ConfigError> {
        Ok(RiskMargin::new(self.risk_margin)?)
    }

    /// Write atomically through a sibling temp file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }

        // Always write the current version, regardless of what was loaded.
        let mut stamped = self.clone();
        stamped.config_version = CURRENT_VERSION;
        let json = serde_json::to_string_pretty(&stamped)?;

        let mut tmp_path = path.as_os_str().to_owned();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);
        std::fs::write(&tmp_path, json.as_bytes()).map_err(write_err)?;
        std::fs::rename(&tmp_path, path).map_err(write_err)?;

        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each step is a pure transform on the raw JSON value.
fn migrate(mut json: Value, from_version: u32) -> Result<Value, ConfigError> {
    if from_version > CURRENT_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }
    let obj = json.as_object_mut().ok_or(ConfigError::NotAnObject)?;

    // v0 → v1: top-level hide_missing_values moved into panels
    if from_version < 1 {
        if let Some(hide) = obj.remove("hide_missing_values") {
            let panels = obj
                .entry("panels")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(panels) = panels.as_object_mut() {
                panels.entry("hide_missing_values").or_insert(hide);
            }
        }
        obj.insert("config_version".to_string(), Value::Number(1.into()));
        tracing::info!("migrated config v0 → v1 (panels.hide_missing_values)");
    }

    // v1 → v2: risk_margin_percent replaced by a fraction
    if from_version < 2 {
        if let Some(percent) = obj.remove("risk_margin_percent")
            && !obj.contains_key("risk_margin")
            && let Some(fraction) = percent.as_f64().map(|p| p / 100.0)
        {
            obj.insert("risk_margin".to_string(), Value::from(fraction));
        }
        obj.insert("config_version".to_string(), Value::Number(2.into()));
        tracing::info!("migrated config v1 → v2 (risk_margin fraction)");
    }

    Ok(json)
}
