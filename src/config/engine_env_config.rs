//! Prediction engine configuration parsing from environment variables.
//!
//! Thresholds are layered: the named profile first, then the optional TOML
//! file at `ENGINE_CONFIG_PATH`, then individual env vars.

use crate::config::{parse_env, parse_optional};
use crate::domain::config::{EngineConfig, EngineOverrides, ThresholdProfile};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Engine environment configuration
#[derive(Debug, Clone)]
pub struct EngineEnvConfig {
    pub profile: ThresholdProfile,
    pub config_path: Option<PathBuf>,
    pub env_overrides: EngineOverrides,
    pub history_cap: usize,
    pub outcome_log_limit: usize,
}

impl EngineEnvConfig {
    pub fn from_env() -> Result<Self> {
        let profile: ThresholdProfile = parse_env("ENGINE_PROFILE", ThresholdProfile::Standard)?;
        let config_path = env::var("ENGINE_CONFIG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let env_overrides = EngineOverrides {
            min_history: parse_optional("MIN_HISTORY")?,
            sureshot_safe_min: parse_optional("SURESHOT_SAFE_MIN")?,
            sureshot_min: parse_optional("SURESHOT_MIN")?,
            high_min: parse_optional("HIGH_MIN")?,
            low_min: parse_optional("LOW_MIN")?,
            low_tier_enabled: parse_optional("LOW_TIER_ENABLED")?,
            recovery_min: parse_optional("RECOVERY_MIN")?,
            recovery_loss_streak: parse_optional("RECOVERY_LOSS_STREAK")?,
            volatility_window: parse_optional("VOLATILITY_WINDOW")?,
            volatility_ratio: parse_optional("VOLATILITY_RATIO")?,
            ..EngineOverrides::default()
        };

        let history_cap: usize = parse_env("HISTORY_CAP", 1000)?;
        if history_cap == 0 {
            anyhow::bail!("HISTORY_CAP must be at least 1");
        }

        Ok(Self {
            profile,
            config_path,
            env_overrides,
            history_cap,
            outcome_log_limit: parse_env("OUTCOME_LOG_LIMIT", 50)?,
        })
    }

    /// Builds the validated engine configuration.
    pub fn to_engine_config(&self) -> Result<EngineConfig> {
        let file_overrides = match &self.config_path {
            Some(path) => Self::load_file(path)?,
            None => EngineOverrides::default(),
        };
        let overrides = file_overrides.merge(self.env_overrides.clone());

        EngineConfig::for_profile(self.profile)
            .with_overrides(&overrides)
            .context("Invalid engine configuration")
    }

    fn load_file(path: &Path) -> Result<EngineOverrides> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse engine config {}", path.display()))
    }
}
