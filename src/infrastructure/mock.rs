use crate::domain::ports::ResultFeed;
use crate::domain::round::{MAX_ROUND_NUMBER, Round};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::RwLock;
use tracing::info;

/// Offline stand-in for the live feed.
///
/// Starts with `initial_rounds` resolved rounds and resolves one more every
/// time page 1 is requested. The sequence is fully determined by the seed.
pub struct SimulatedResultFeed {
    state: RwLock<SimulationState>,
}

struct SimulationState {
    rng: StdRng,
    /// Oldest first
    rounds: Vec<Round>,
    next_id: u64,
}

impl SimulationState {
    fn advance(&mut self) -> Result<Round> {
        let round = Round::new(self.next_id, self.rng.random_range(0..=MAX_ROUND_NUMBER))?;
        self.next_id += 1;
        self.rounds.push(round);
        Ok(round)
    }
}

impl SimulatedResultFeed {
    pub fn new(seed: u64, first_id: u64, initial_rounds: usize) -> Result<Self> {
        let mut state = SimulationState {
            rng: StdRng::seed_from_u64(seed),
            rounds: Vec::with_capacity(initial_rounds),
            next_id: first_id,
        };
        for _ in 0..initial_rounds {
            state.advance()?;
        }
        info!(
            "SimulatedResultFeed: seed {} with {} pre-resolved rounds",
            seed, initial_rounds
        );
        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

#[async_trait]
impl ResultFeed for SimulatedResultFeed {
    async fn fetch_page(&self, page_no: u32, page_size: u32) -> Result<Vec<Round>> {
        let mut state = self.state.write().await;
        if page_no == 1 {
            state.advance()?;
        }

        // Newest first, like the live endpoint
        let skip = page_no.saturating_sub(1) as usize * page_size as usize;
        Ok(state
            .rounds
            .iter()
            .rev()
            .skip(skip)
            .take(page_size as usize)
            .copied()
            .collect())
    }
}

/// Feed that replays queued responses in order, then returns empty pages.
#[derive(Default)]
pub struct ScriptedResultFeed {
    responses: Mutex<VecDeque<Result<Vec<Round>, String>>>,
}

impl ScriptedResultFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, rounds: Vec<Round>) {
        self.queue().push_back(Ok(rounds));
    }

    pub fn push_error(&self, message: &str) {
        self.queue().push_back(Err(message.to_string()));
    }

    pub fn remaining(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Vec<Round>, String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ResultFeed for ScriptedResultFeed {
    async fn fetch_page(&self, _page_no: u32, _page_size: u32) -> Result<Vec<Round>> {
        match self.queue().pop_front() {
            Some(Ok(rounds)) => Ok(rounds),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_feed_pages_newest_first() {
        let feed = SimulatedResultFeed::new(42, 1000, 50).unwrap();

        let first = feed.fetch_page(1, 10).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].id(), 1050);
        assert_eq!(first[9].id(), 1041);

        let second = feed.fetch_page(2, 10).await.unwrap();
        assert_eq!(second[0].id(), 1040);
    }

    #[tokio::test]
    async fn test_simulated_feed_is_seeded() {
        let a = SimulatedResultFeed::new(7, 1, 30).unwrap();
        let b = SimulatedResultFeed::new(7, 1, 30).unwrap();
        assert_eq!(
            a.fetch_page(1, 31).await.unwrap(),
            b.fetch_page(1, 31).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_simulated_latest_advances() {
        let feed = SimulatedResultFeed::new(1, 500, 5).unwrap();
        let a = feed.fetch_page(1, 1).await.unwrap();
        let b = feed.fetch_page(1, 1).await.unwrap();
        assert_eq!(a[0].id(), 505);
        assert_eq!(b[0].id(), 506);
    }

    #[tokio::test]
    async fn test_scripted_feed_replays_in_order() {
        let feed = ScriptedResultFeed::new();
        feed.push_page(vec![Round::new(1, 3).unwrap()]);
        feed.push_error("boom");
        assert_eq!(feed.remaining(), 2);

        assert_eq!(feed.fetch_page(1, 10).await.unwrap().len(), 1);
        assert!(feed.fetch_page(1, 10).await.is_err());
        assert!(feed.fetch_page(1, 10).await.unwrap().is_empty());
    }
}
