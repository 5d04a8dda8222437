//! Repository Pattern Abstractions
//!
//! Storage contract for observed rounds, so the poller can persist history
//! without knowing whether it lands in memory or in SQLite.
//!
//! # Contract
//!
//! - Primary key is the round id
//! - Stored attributes are `number` and its derived class
//! - `save` is an idempotent upsert: saving the same id twice keeps one row

use crate::domain::round::Round;
use anyhow::Result;
use async_trait::async_trait;

/// Repository for persisting and retrieving observed rounds
#[async_trait]
pub trait RoundRepository: Send + Sync {
    /// Upsert a single round
    async fn save(&self, round: &Round) -> Result<()>;

    /// Upsert several rounds
    async fn save_all(&self, rounds: &[Round]) -> Result<()> {
        for round in rounds {
            self.save(round).await?;
        }
        Ok(())
    }

    /// The newest `limit` rounds, oldest first
    async fn load_recent(&self, limit: usize) -> Result<Vec<Round>>;

    /// Count stored rounds
    async fn count(&self) -> Result<usize>;
}
