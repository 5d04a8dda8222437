//! Result feed configuration parsing from environment variables.
//!
//! This module handles the upstream endpoint, paging and poll timing.

use crate::config::{parse_env, parse_optional};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Feed environment configuration
#[derive(Debug, Clone)]
pub struct FeedEnvConfig {
    /// Required in live mode
    pub url: Option<Url>,
    pub page_size: u32,
    pub backfill_pages: u32,
    pub poll_interval_ms: u64,
    pub error_backoff_ms: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Seed of the simulated feed in mock mode
    pub mock_seed: u64,
}

impl FeedEnvConfig {
    pub fn from_env() -> Result<Self> {
        let url = match env::var("FEED_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim()).with_context(|| format!("Invalid FEED_URL: {}", raw))?,
            ),
            _ => None,
        };

        let page_size: u32 = parse_env("FEED_PAGE_SIZE", 20)?;
        if page_size == 0 {
            anyhow::bail!("FEED_PAGE_SIZE must be at least 1");
        }

        Ok(Self {
            url,
            page_size,
            backfill_pages: parse_env("FEED_BACKFILL_PAGES", 5)?,
            poll_interval_ms: parse_env("POLL_INTERVAL_MS", 2000)?,
            error_backoff_ms: parse_env("ERROR_BACKOFF_MS", 5000)?,
            timeout_secs: parse_env("FEED_TIMEOUT_SECS", 5)?,
            max_retries: parse_env("FEED_MAX_RETRIES", 3)?,
            mock_seed: parse_env("MOCK_SEED", 42)?,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
