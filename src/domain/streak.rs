use crate::domain::round::OutcomeClass;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of scoring an actionable prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Win,
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "WIN"),
            Outcome::Loss => write!(f, "LOSS"),
        }
    }
}

/// Win/loss counters that gate recovery mode.
///
/// `record_outcome` is the only mutator. Each resolved round id is scored at
/// most once: ids at or below the last scored id are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakState {
    wins: u64,
    losses: u64,
    consecutive_losses: u32,
    max_consecutive_losses: u32,
    last_scored_id: Option<u64>,
}

impl StreakState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores the prediction that targeted `round_id`.
    ///
    /// Returns `None` when nothing was counted: the tier was not actionable,
    /// there was no label, or the round was already scored.
    pub fn record_outcome(
        &mut self,
        round_id: u64,
        predicted: Option<OutcomeClass>,
        tier_was_actionable: bool,
        actual: OutcomeClass,
    ) -> Option<Outcome> {
        if self.last_scored_id.is_some_and(|last| round_id <= last) {
            return None;
        }
        self.last_scored_id = Some(round_id);

        let predicted = predicted.filter(|_| tier_was_actionable)?;

        if predicted == actual {
            self.wins += 1;
            self.consecutive_losses = 0;
            Some(Outcome::Win)
        } else {
            self.losses += 1;
            self.consecutive_losses += 1;
            self.max_consecutive_losses = self.max_consecutive_losses.max(self.consecutive_losses);
            Some(Outcome::Loss)
        }
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn losses(&self) -> u64 {
        self.losses
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.consecutive_losses
    }

    pub fn max_consecutive_losses(&self) -> u32 {
        self.max_consecutive_losses
    }

    pub fn last_scored_id(&self) -> Option<u64> {
        self.last_scored_id
    }

    /// Fraction of scored predictions that won, `None` before the first score.
    pub fn win_rate(&self) -> Option<f64> {
        let total = self.wins + self.losses;
        (total > 0).then(|| self.wins as f64 / total as f64)
    }

    #[cfg(test)]
    pub(crate) fn with_consecutive_losses(count: u32) -> Self {
        Self {
            losses: count as u64,
            consecutive_losses: count,
            max_consecutive_losses: count,
            ..Self::default()
        }
    }
}
