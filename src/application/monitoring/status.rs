use crate::domain::prediction::Tier;
use crate::domain::round::{OutcomeClass, Round};
use crate::domain::streak::Outcome;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One scored prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeLogEntry {
    pub round_id: u64,
    pub predicted: OutcomeClass,
    pub actual: OutcomeClass,
    pub number: u8,
    pub tier: Tier,
    pub outcome: Outcome,
    pub resolved_at: DateTime<Utc>,
}

/// Read-only view of the session handed to status surfaces.
///
/// `period` is the round the current prediction targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub period: Option<u64>,
    pub prediction: Option<OutcomeClass>,
    pub tier: Tier,
    pub strength: f64,
    pub consecutive_losses: u32,
    pub wins: u64,
    pub losses: u64,
    /// `None` until the first actionable prediction is scored
    pub win_rate: Option<f64>,
    pub history_size: usize,
    pub latest_round: Option<Round>,
    pub recent_outcomes: Vec<OutcomeLogEntry>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StatusSnapshot {
    /// One-line summary for log output.
    pub fn headline(&self) -> String {
        let period = self
            .period
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let prediction = self
            .prediction
            .map(|label| label.to_string())
            .unwrap_or_else(|| "--".to_string());
        let win_rate = self
            .win_rate
            .map(|rate| format!("{:.1}%", rate * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "Period {} | {} [{}] | W/L {}/{} ({}) | Losses in row {} | History {}",
            period,
            prediction,
            self.tier,
            self.wins,
            self.losses,
            win_rate,
            self.consecutive_losses,
            self.history_size
        )
    }
}
