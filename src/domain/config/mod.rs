//! Configuration domain module
//!
//! Domain value objects for engine tuning, kept apart from the env-driven
//! `crate::config` loader so they can be validated and tested on their own.

pub mod engine_config;

pub use engine_config::{
    DepthWeight, EngineConfig, EngineConfigError, EngineOverrides, ThresholdProfile,
};
