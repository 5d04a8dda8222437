//! In-memory repository implementation
//!
//! Thread-safe storage for observed rounds that satisfies the same contract
//! as the SQLite repository. Data is lost on restart.

use crate::domain::repositories::RoundRepository;
use crate::domain::round::Round;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of RoundRepository, keyed and ordered by round id
pub struct InMemoryRoundRepository {
    rounds: Arc<RwLock<BTreeMap<u64, Round>>>,
}

impl InMemoryRoundRepository {
    pub fn new() -> Self {
        Self {
            rounds: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryRoundRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoundRepository for InMemoryRoundRepository {
    async fn save(&self, round: &Round) -> Result<()> {
        self.rounds.write().await.insert(round.id(), *round);
        Ok(())
    }

    async fn save_all(&self, rounds: &[Round]) -> Result<()> {
        let mut stored = self.rounds.write().await;
        for round in rounds {
            stored.insert(round.id(), *round);
        }
        Ok(())
    }

    async fn load_recent(&self, limit: usize) -> Result<Vec<Round>> {
        let stored = self.rounds.read().await;
        let mut recent: Vec<Round> = stored.values().rev().take(limit).copied().collect();
        recent.reverse();
        Ok(recent)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.rounds.read().await.len())
    }
}
