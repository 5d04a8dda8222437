use crate::application::history::HistoryStore;
use crate::application::monitoring::status::{OutcomeLogEntry, StatusSnapshot};
use crate::application::prediction::PredictionEngine;
use crate::domain::config::EngineConfig;
use crate::domain::prediction::{Prediction, Tier};
use crate::domain::round::Round;
use crate::domain::streak::Outcome;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Prediction issued for a round that has not resolved yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPrediction {
    pub target_id: u64,
    pub prediction: Prediction,
    pub issued_at: DateTime<Utc>,
}

/// A pending prediction that met its round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub round: Round,
    pub prediction: Prediction,
    /// `None` when the tier was not actionable
    pub outcome: Option<Outcome>,
}

/// What one ingest call changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Rounds that were new and are still retained
    pub inserted: Vec<Round>,
    pub resolution: Option<Resolution>,
    /// Set when the newest round changed and a fresh prediction was issued
    pub issued: Option<PendingPrediction>,
}

/// Owns the history, the engine and the prediction in flight.
///
/// One session exists per process and has a single writer (the poller).
/// Readers take a `StatusSnapshot`.
#[derive(Debug)]
pub struct PredictionSession {
    store: HistoryStore,
    engine: PredictionEngine,
    pending: Option<PendingPrediction>,
    last_analyzed_id: Option<u64>,
    outcome_log: VecDeque<OutcomeLogEntry>,
    outcome_log_limit: usize,
    updated_at: Option<DateTime<Utc>>,
}

impl PredictionSession {
    pub fn new(config: EngineConfig, history_cap: usize, outcome_log_limit: usize) -> Self {
        Self {
            store: HistoryStore::new(history_cap),
            engine: PredictionEngine::new(config),
            pending: None,
            last_analyzed_id: None,
            outcome_log: VecDeque::with_capacity(outcome_log_limit),
            outcome_log_limit,
            updated_at: None,
        }
    }

    /// Loads rounds without resolving or issuing predictions.
    ///
    /// Used for restored and backfilled history before the first poll.
    pub fn seed<I>(&mut self, rounds: I) -> Vec<Round>
    where
        I: IntoIterator<Item = Round>,
    {
        let inserted = self.store.extend(rounds);
        if !inserted.is_empty() {
            info!(
                "PredictionSession: seeded {} rounds (history size {})",
                inserted.len(),
                self.store.len()
            );
        }
        inserted
    }

    /// Folds a batch of observed rounds into the session.
    ///
    /// New rounds enter the store. If the pending prediction's target round is
    /// now known it is scored exactly once. When the newest round changed, a
    /// prediction for `newest.id + 1` is issued.
    pub fn ingest<I>(&mut self, rounds: I) -> TickReport
    where
        I: IntoIterator<Item = Round>,
    {
        let mut report = TickReport {
            inserted: self.store.extend(rounds),
            ..TickReport::default()
        };

        let Some(latest) = self.store.latest().copied() else {
            return report;
        };
        if self.last_analyzed_id == Some(latest.id()) {
            return report;
        }

        report.resolution = self.resolve_pending(latest.id());
        report.issued = self.issue(latest);
        self.last_analyzed_id = Some(latest.id());
        self.updated_at = Some(Utc::now());
        report
    }

    fn resolve_pending(&mut self, latest_id: u64) -> Option<Resolution> {
        let pending = self.pending?;

        let Some(round) = self.store.get(pending.target_id).copied() else {
            if pending.target_id < latest_id {
                debug!(
                    "PredictionSession: dropping prediction for {} (round never observed)",
                    pending.target_id
                );
                self.pending = None;
            }
            return None;
        };
        self.pending = None;

        let prediction = pending.prediction;
        let outcome = self.engine.record_outcome(
            round.id(),
            prediction.label,
            prediction.tier.is_actionable(),
            round.class(),
        );

        if let (Some(outcome), Some(predicted)) = (outcome, prediction.label) {
            info!(
                "PredictionSession: round {} resolved {} ({} predicted {} via {})",
                round.id(),
                outcome,
                round.class(),
                predicted,
                prediction.tier
            );
            self.push_log(OutcomeLogEntry {
                round_id: round.id(),
                predicted,
                actual: round.class(),
                number: round.number(),
                tier: prediction.tier,
                outcome,
                resolved_at: Utc::now(),
            });
        }

        Some(Resolution {
            round,
            prediction,
            outcome,
        })
    }

    /// `None` when the newest id has no successor.
    fn issue(&mut self, latest: Round) -> Option<PendingPrediction> {
        let Some(target_id) = latest.id().checked_add(1) else {
            warn!(
                "PredictionSession: round {} has no successor id, not predicting",
                latest.id()
            );
            self.pending = None;
            return None;
        };

        let history = self.store.view(self.store.cap());
        let prediction = self.engine.analyze(&history);
        let pending = PendingPrediction {
            target_id,
            prediction,
            issued_at: Utc::now(),
        };

        if prediction.tier != Tier::Syncing {
            info!(
                "PredictionSession: next round {} -> {} [{}] (strength {:.3})",
                pending.target_id,
                prediction
                    .label
                    .map(|label| label.to_string())
                    .unwrap_or_else(|| "--".to_string()),
                prediction.tier,
                prediction.strength
            );
        }

        self.pending = Some(pending);
        Some(pending)
    }

    fn push_log(&mut self, entry: OutcomeLogEntry) {
        if self.outcome_log_limit == 0 {
            return;
        }
        self.outcome_log.push_front(entry);
        self.outcome_log.truncate(self.outcome_log_limit);
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    pub fn pending(&self) -> Option<&PendingPrediction> {
        self.pending.as_ref()
    }

    /// Newest-first log of scored predictions.
    pub fn outcome_log(&self) -> impl Iterator<Item = &OutcomeLogEntry> {
        self.outcome_log.iter()
    }

    /// Read-only view for status reporting.
    pub fn snapshot(&self) -> StatusSnapshot {
        let streak = self.engine.streak();
        let prediction = self.pending.map(|p| p.prediction);

        StatusSnapshot {
            period: self.pending.map(|p| p.target_id),
            prediction: prediction.and_then(|p| p.label),
            tier: prediction.map(|p| p.tier).unwrap_or(Tier::Syncing),
            strength: prediction.map(|p| p.strength).unwrap_or(0.0),
            consecutive_losses: streak.consecutive_losses(),
            wins: streak.wins(),
            losses: streak.losses(),
            win_rate: streak.win_rate(),
            history_size: self.store.len(),
            latest_round: self.store.latest().copied(),
            recent_outcomes: self.outcome_log.iter().cloned().collect(),
            updated_at: self.updated_at,
        }
    }
}
