use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use burnwatch_core::write_text_atomic;
use thiserror::Error;
use tracing::{info, warn};

use crate::threshold_config::{ConfigField, ConfigValue, PersistedConfigState, ThresholdConfig};

#[derive(Debug, Clone, PartialEq, Error)]
/// Failures reported by `ConfigStore` mutations.
pub enum ConfigStoreError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: ConfigField, reason: String },
    #[error("field {field} expects a {expected} value, got a {actual}")]
    TypeMismatch {
        field: ConfigField,
        expected: &'static str,
        actual: &'static str,
    },
    /// The mutation was applied in memory but the snapshot could not be written.
    #[error("failed to persist config state: {detail}")]
    Persist {
        applied: ThresholdConfig,
        detail: String,
    },
}

/// Reads a persisted threshold snapshot.
///
/// Returns `Ok(None)` when no snapshot exists yet.
pub fn load_threshold_config_state(path: &Path) -> Result<Option<ThresholdConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config state file {}", path.display()))?;
    let persisted = serde_json::from_str::<PersistedConfigState>(&raw)
        .with_context(|| format!("failed to parse config state file {}", path.display()))?;
    let config = persisted
        .into_config()
        .map_err(|reason| anyhow!("invalid config state file {}: {reason}", path.display()))?;
    Ok(Some(config))
}

/// Single owner and writer of the process-wide `ThresholdConfig`.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: ThresholdConfig,
}

impl ConfigStore {
    /// Loads the snapshot at `path`, falling back to defaults when it is
    /// missing or unusable. Never fails; a broken file is retried on the next
    /// process start.
    pub fn load(path: PathBuf) -> Self {
        let config = match load_threshold_config_state(&path) {
            Ok(Some(config)) => {
                info!(path = %path.display(), "loaded persisted threshold config");
                config
            }
            Ok(None) => {
                info!(
                    path = %path.display(),
                    "no persisted threshold config found; using defaults"
                );
                ThresholdConfig::default()
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "persisted threshold config unusable; using defaults"
                );
                ThresholdConfig::default()
            }
        };
        Self { path, config }
    }

    /// Builds a store around an explicit snapshot without touching disk.
    pub fn with_config(path: PathBuf, config: ThresholdConfig) -> Self {
        Self { path, config }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current in-memory snapshot.
    pub fn get(&self) -> ThresholdConfig {
        self.config
    }

    /// Applies one field mutation and persists the full snapshot.
    ///
    /// Numbers must be finite, except `+inf` for `MaxMcap` which restores the
    /// unbounded default. Validation failures leave the state untouched. A persistence failure
    /// keeps the new value in memory and is returned as
    /// `ConfigStoreError::Persist`.
    pub fn set(
        &mut self,
        field: ConfigField,
        value: ConfigValue,
    ) -> Result<ThresholdConfig, ConfigStoreError> {
        let mut next = self.config;
        match (field, value) {
            (ConfigField::Enabled, ConfigValue::Bool(enabled)) => next.enabled = enabled,
            (ConfigField::Enabled, other) => {
                return Err(ConfigStoreError::TypeMismatch {
                    field,
                    expected: "boolean",
                    actual: other.kind(),
                })
            }
            (_, ConfigValue::Bool(_)) => {
                return Err(ConfigStoreError::TypeMismatch {
                    field,
                    expected: "number",
                    actual: "boolean",
                })
            }
            (ConfigField::MaxMcap, ConfigValue::Number(number)) if number == f64::INFINITY => {
                next.max_mcap = number
            }
            (_, ConfigValue::Number(number)) if !number.is_finite() => {
                return Err(ConfigStoreError::InvalidValue {
                    field,
                    reason: format!("{number} is not a finite number"),
                })
            }
            (ConfigField::MinSol, ConfigValue::Number(number)) => next.min_sol = number,
            (ConfigField::MaxSol, ConfigValue::Number(number)) => next.max_sol = number,
            (ConfigField::MinMcap, ConfigValue::Number(number)) => next.min_mcap = number,
            (ConfigField::MaxMcap, ConfigValue::Number(number)) => next.max_mcap = number,
        }

        self.config = next;
        info!(field = %field, "threshold config updated");
        self.persist()?;
        Ok(self.config)
    }

    /// Flips `enabled`, persists, and returns the new value.
    pub fn toggle_enabled(&mut self) -> Result<bool, ConfigStoreError> {
        let enabled = !self.config.enabled;
        self.set(ConfigField::Enabled, ConfigValue::Bool(enabled))
            .map(|config| config.enabled)
    }

    fn persist(&self) -> Result<(), ConfigStoreError> {
        self.write_snapshot().map_err(|error| {
            let detail = format!("{error:#}");
            warn!(
                path = %self.path.display(),
                error = %detail,
                "threshold config kept in memory only"
            );
            ConfigStoreError::Persist {
                applied: self.config,
                detail,
            }
        })
    }

    fn write_snapshot(&self) -> Result<()> {
        let mut payload = serde_json::to_string_pretty(&PersistedConfigState::from(&self.config))
            .context("failed to serialize config state")?;
        payload.push('\n');
        write_text_atomic(&self.path, &payload)
            .with_context(|| format!("failed to write config state file {}", self.path.display()))
    }
}
