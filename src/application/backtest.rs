use crate::application::session::PredictionSession;
use crate::domain::config::EngineConfig;
use crate::domain::prediction::Tier;
use crate::domain::round::Round;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::iter;

/// Outcome of replaying one round sequence through one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub label: String,
    pub rounds: usize,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: Option<f64>,
    pub max_consecutive_losses: u32,
    /// Predictions issued per tier, including non-actionable ones
    pub tiers: HashMap<Tier, u64>,
}

impl BacktestReport {
    pub fn tier_count(&self, tier: Tier) -> u64 {
        self.tiers.get(&tier).copied().unwrap_or(0)
    }

    /// Predictions that were eligible for scoring
    pub fn actionable(&self) -> u64 {
        self.tiers
            .iter()
            .filter(|(tier, _)| tier.is_actionable())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Replays recorded rounds one at a time, as the poller would see them.
pub struct Backtester;

impl Backtester {
    /// Feeds `rounds` through a fresh session built from `config`.
    ///
    /// Rounds are replayed in id order. `history_cap` bounds the session's
    /// history exactly as it does live.
    pub fn replay(
        label: &str,
        rounds: &[Round],
        config: EngineConfig,
        history_cap: usize,
    ) -> BacktestReport {
        let mut ordered = rounds.to_vec();
        ordered.sort_by_key(Round::id);
        ordered.dedup_by_key(|round| round.id());

        let mut session = PredictionSession::new(config, history_cap, 0);
        let mut tiers: HashMap<Tier, u64> = HashMap::new();

        for round in &ordered {
            let report = session.ingest(iter::once(*round));
            if let Some(issued) = report.issued {
                *tiers.entry(issued.prediction.tier).or_insert(0) += 1;
            }
        }

        let streak = session.engine().streak();
        BacktestReport {
            label: label.to_string(),
            rounds: ordered.len(),
            wins: streak.wins(),
            losses: streak.losses(),
            win_rate: streak.win_rate(),
            max_consecutive_losses: streak.max_consecutive_losses(),
            tiers,
        }
    }

    /// Replays the same rounds through every configuration in parallel.
    ///
    /// Reports come back in the order of `profiles`.
    pub fn run_profiles(
        rounds: &[Round],
        profiles: &[(String, EngineConfig)],
        history_cap: usize,
    ) -> Vec<BacktestReport> {
        profiles
            .par_iter()
            .map(|(label, config)| Self::replay(label, rounds, config.clone(), history_cap))
            .collect()
    }
}
