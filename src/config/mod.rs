//! Configuration module for roundcast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Feed, Engine, Storage, and Observability.

mod engine_env_config;
mod feed_config;
mod observability_config;
mod storage_config;

pub use engine_env_config::EngineEnvConfig;
pub use feed_config::FeedEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use storage_config::{StorageBackend, StorageEnvConfig};

use crate::domain::config::EngineConfig;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Where rounds come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Seeded simulated feed, no network
    Mock,
    /// HTTP feed at `FEED_URL`
    Live,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "live" => Ok(Mode::Live),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'mock' or 'live'", s),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Mock => write!(f, "mock"),
            Mode::Live => write!(f, "live"),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub feed: FeedEnvConfig,
    pub engine: EngineEnvConfig,
    pub storage: StorageEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mode: Mode = parse_env("MODE", Mode::Mock)?;

        let feed = FeedEnvConfig::from_env().context("Failed to load feed config")?;
        let engine = EngineEnvConfig::from_env().context("Failed to load engine config")?;
        let storage = StorageEnvConfig::from_env().context("Failed to load storage config")?;
        let observability = ObservabilityEnvConfig::from_env();

        if mode == Mode::Live && feed.url.is_none() {
            anyhow::bail!("FEED_URL is required when MODE=live");
        }

        Ok(Self {
            mode,
            feed,
            engine,
            storage,
            observability,
        })
    }

    /// Validated thresholds for the prediction engine
    pub fn to_engine_config(&self) -> Result<EngineConfig> {
        self.engine.to_engine_config()
    }
}

/// Reads `key`, falling back to `default` when unset.
pub(crate) fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match parse_optional(key)? {
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

/// Reads `key`, returning `None` when unset or blank.
pub(crate) fn parse_optional<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("Failed to parse {}: {}", key, e)),
        _ => Ok(None),
    }
}
