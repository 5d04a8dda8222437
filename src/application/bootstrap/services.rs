use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, Mode};
use crate::domain::ports::ResultFeed;
use crate::infrastructure::feed::HttpResultFeed;
use crate::infrastructure::mock::SimulatedResultFeed;

pub struct ServicesHandle {
    pub feed: Arc<dyn ResultFeed>,
}

pub struct ServicesBootstrap;

impl ServicesBootstrap {
    pub fn init(config: &Config) -> Result<ServicesHandle> {
        let feed: Arc<dyn ResultFeed> = match config.mode {
            Mode::Mock => {
                // Enough resolved rounds for a full backfill
                let initial_rounds =
                    (config.feed.page_size as usize) * (config.feed.backfill_pages.max(1) as usize);
                info!(
                    "Using simulated result feed (seed {}, {} rounds)",
                    config.feed.mock_seed, initial_rounds
                );
                Arc::new(SimulatedResultFeed::new(
                    config.feed.mock_seed,
                    Self::simulated_first_id(),
                    initial_rounds,
                )?)
            }
            Mode::Live => {
                let url = config
                    .feed
                    .url
                    .clone()
                    .context("FEED_URL is required when MODE=live")?;
                info!("Using HTTP result feed at {}", url);
                Arc::new(HttpResultFeed::new(
                    url,
                    config.feed.timeout(),
                    config.feed.max_retries,
                ))
            }
        };

        Ok(ServicesHandle { feed })
    }

    /// Date-prefixed ids in the style of the live feed (`YYYYMMDD0001`)
    fn simulated_first_id() -> u64 {
        let today = Utc::now().date_naive();
        let date = u64::from(today.year().unsigned_abs()) * 10_000
            + u64::from(today.month()) * 100
            + u64::from(today.day());
        date * 10_000 + 1
    }
}
