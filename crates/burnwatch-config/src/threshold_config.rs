use serde::{Deserialize, Serialize};

pub const CONFIG_STATE_SCHEMA_VERSION: u32 = 1;

const DEFAULT_MIN_SOL: f64 = 0.0;
const DEFAULT_MAX_SOL: f64 = 100.0;
const DEFAULT_MIN_MCAP: f64 = 0.0;

/// Forwarding switch plus the inclusive SOL and market-cap bounds.
///
/// `max_mcap` may be `f64::INFINITY`, meaning no upper market-cap bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub enabled: bool,
    pub min_sol: f64,
    pub max_sol: f64,
    pub min_mcap: f64,
    pub max_mcap: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_sol: DEFAULT_MIN_SOL,
            max_sol: DEFAULT_MAX_SOL,
            min_mcap: DEFAULT_MIN_MCAP,
            max_mcap: f64::INFINITY,
        }
    }
}

impl ThresholdConfig {
    /// Returns true when the market-cap range has no upper bound.
    pub fn max_mcap_is_unbounded(&self) -> bool {
        self.max_mcap == f64::INFINITY
    }

    /// Returns the first field whose lower bound exceeds its upper bound.
    pub fn inverted_range(&self) -> Option<(ConfigField, ConfigField)> {
        if self.min_sol > self.max_sol {
            return Some((ConfigField::MinSol, ConfigField::MaxSol));
        }
        if self.min_mcap > self.max_mcap {
            return Some((ConfigField::MinMcap, ConfigField::MaxMcap));
        }
        None
    }

    /// Returns the numeric bound stored in `field`, or `None` for `Enabled`.
    pub fn bound(&self, field: ConfigField) -> Option<f64> {
        match field {
            ConfigField::Enabled => None,
            ConfigField::MinSol => Some(self.min_sol),
            ConfigField::MaxSol => Some(self.max_sol),
            ConfigField::MinMcap => Some(self.min_mcap),
            ConfigField::MaxMcap => Some(self.max_mcap),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Enumerates the mutable `ThresholdConfig` fields.
pub enum ConfigField {
    Enabled,
    MinSol,
    MaxSol,
    MinMcap,
    MaxMcap,
}

impl ConfigField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::MinSol => "min_sol",
            Self::MaxSol => "max_sol",
            Self::MinMcap => "min_mcap",
            Self::MaxMcap => "max_mcap",
        }
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Value written to a `ConfigField`.
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
}

impl ConfigValue {
    pub fn kind(self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
        }
    }
}

/// On-disk shape of the threshold snapshot. `max_mcap: null` encodes no bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PersistedConfigState {
    pub(crate) schema_version: u32,
    pub(crate) enabled: bool,
    pub(crate) min_sol: f64,
    pub(crate) max_sol: f64,
    pub(crate) min_mcap: f64,
    #[serde(default)]
    pub(crate) max_mcap: Option<f64>,
}

impl From<&ThresholdConfig> for PersistedConfigState {
    fn from(config: &ThresholdConfig) -> Self {
        Self {
            schema_version: CONFIG_STATE_SCHEMA_VERSION,
            enabled: config.enabled,
            min_sol: config.min_sol,
            max_sol: config.max_sol,
            min_mcap: config.min_mcap,
            max_mcap: (!config.max_mcap_is_unbounded()).then_some(config.max_mcap),
        }
    }
}

impl PersistedConfigState {
    pub(crate) fn into_config(self) -> Result<ThresholdConfig, String> {
        if self.schema_version != CONFIG_STATE_SCHEMA_VERSION {
            return Err(format!(
                "unsupported config state schema: expected {}, found {}",
                CONFIG_STATE_SCHEMA_VERSION, self.schema_version
            ));
        }
        let max_mcap = self.max_mcap.unwrap_or(f64::INFINITY);
        for (field, value) in [
            (ConfigField::MinSol, self.min_sol),
            (ConfigField::MaxSol, self.max_sol),
            (ConfigField::MinMcap, self.min_mcap),
        ] {
            if !value.is_finite() {
                return Err(format!("field {field} is not a finite number"));
            }
        }
        if max_mcap.is_nan() || max_mcap == f64::NEG_INFINITY {
            return Err(format!("field {} is not a valid bound", ConfigField::MaxMcap));
        }
        Ok(ThresholdConfig {
            enabled: self.enabled,
            min_sol: self.min_sol,
            max_sol: self.max_sol,
            min_mcap: self.min_mcap,
            max_mcap,
        })
    }
}
