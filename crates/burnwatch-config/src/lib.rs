//! Operator-controlled threshold state for burn-event forwarding.
//!
//! `ThresholdConfig` is the single process-wide filter configuration and
//! `ConfigStore` is its only writer: it loads the persisted snapshot at
//! startup, applies one field mutation at a time and rewrites the whole
//! snapshot atomically after each one.

pub mod config_store;
pub mod threshold_config;

pub use config_store::{load_threshold_config_state, ConfigStore, ConfigStoreError};
pub use threshold_config::{
    ConfigField, ConfigValue, ThresholdConfig, CONFIG_STATE_SCHEMA_VERSION,
};
