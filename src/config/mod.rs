//! Configuration for adamscore
//!
//! This module handles:
//! - The user config file (`~/.config/adamscore/config.toml`)
//! - Explicit `--config` files
//! - Environment overrides for keys, provider, models and timeout
//!
//! Tier and ideal-range tables are not configurable; they live as statics
//! in [`crate::scoring`].

mod settings;

pub use settings::{
    NarrativeSettings, Settings, DEFAULT_COMPARE_MODELS, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, MAX_WORKERS,
};
