use crate::application::prediction::pattern::{PatternSignal, scan_depth};
use crate::application::prediction::signals;
use crate::application::prediction::vote::{Vote, weighted_vote};
use crate::domain::config::EngineConfig;
use crate::domain::prediction::{Prediction, Tier};
use crate::domain::round::{OutcomeClass, Round};
use crate::domain::streak::{Outcome, StreakState};
use tracing::debug;

/// Everything the decision tree reads, computed from one history snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub vote: Vote,
    pub signals: Vec<PatternSignal>,
    pub unstable_trigger: bool,
    pub volatile_window: bool,
    pub symmetric: bool,
}

impl Assessment {
    pub fn label(&self) -> OutcomeClass {
        self.vote.label
    }

    pub fn strength(&self) -> f64 {
        self.vote.strength
    }
}

/// Pattern-matching predictor plus the streak that gates recovery mode.
///
/// Analysis is pure: the same history and streak always produce the same
/// prediction. The streak changes only through `record_outcome`.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    config: EngineConfig,
    streak: StreakState,
}

impl PredictionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            streak: StreakState::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    /// Predicts the round after the newest one in `history` (oldest first).
    pub fn analyze(&self, history: &[Round]) -> Prediction {
        self.analyze_with(history, &self.streak)
    }

    /// Same as `analyze` against an explicit streak snapshot.
    pub fn analyze_with(&self, history: &[Round], streak: &StreakState) -> Prediction {
        let Some(assessment) = self.assess(history) else {
            debug!(
                "PredictionEngine: syncing ({} of {} rounds)",
                history.len(),
                self.config.min_history
            );
            return Prediction::syncing();
        };

        let prediction = self.decide(&assessment, streak);
        debug!(
            "PredictionEngine: {} -> {:?} (strength={:.4}, trigger={}, volatile={}, symmetric={}, losses_in_row={})",
            prediction.tier,
            prediction.label,
            assessment.strength(),
            assessment.unstable_trigger,
            assessment.volatile_window,
            assessment.symmetric,
            streak.consecutive_losses()
        );
        prediction
    }

    /// Runs the pattern search and gates, or `None` below the minimum history.
    pub fn assess(&self, history: &[Round]) -> Option<Assessment> {
        if history.len() < self.config.min_history {
            return None;
        }
        let latest = history.last()?;

        let classes: Vec<OutcomeClass> = history.iter().map(Round::class).collect();
        let depth_signals: Vec<PatternSignal> = self
            .config
            .depths
            .iter()
            .map(|dw| scan_depth(&classes, dw.depth, self.config.tie_break))
            .collect();

        let weighted: Vec<(PatternSignal, f64)> = depth_signals
            .iter()
            .zip(&self.config.depths)
            .map(|(signal, dw)| (*signal, dw.weight))
            .collect();

        let vote = weighted_vote(
            &weighted,
            self.config.vote_divisor,
            self.config.vote_tie_break,
            latest.class(),
            self.config.fallback_strength,
        );

        Some(Assessment {
            vote,
            signals: depth_signals,
            unstable_trigger: signals::unstable_trigger(history, &self.config),
            volatile_window: signals::volatile_window(history, &self.config),
            symmetric: signals::symmetric(history),
        })
    }

    /// Decision tree, first match wins.
    pub fn decide(&self, assessment: &Assessment, streak: &StreakState) -> Prediction {
        let cfg = &self.config;
        let label = assessment.label();
        let strength = assessment.strength();

        if assessment.unstable_trigger {
            return if strength > cfg.sureshot_safe_min && assessment.symmetric {
                Prediction::bet(label, Tier::SureshotSafe, strength)
            } else {
                Prediction::skip(Tier::SkipUnstable, strength)
            };
        }

        if streak.consecutive_losses() >= cfg.recovery_loss_streak {
            return if strength > cfg.recovery_min {
                Prediction::bet(label, Tier::Recovery, strength)
            } else {
                Prediction::skip(Tier::SkipRecovery, strength)
            };
        }

        if strength > cfg.sureshot_min && assessment.symmetric {
            return Prediction::bet(label, Tier::Sureshot, strength);
        }

        if strength > cfg.high_min {
            return Prediction::bet(label, Tier::High, strength);
        }

        if assessment.volatile_window {
            return Prediction::skip(Tier::WaitingVolatile, strength);
        }

        if cfg.low_tier_enabled && strength > cfg.low_min {
            return Prediction::bet(label, Tier::Low, strength);
        }

        Prediction::skip(Tier::Waiting, strength)
    }

    /// Scores the prediction that targeted `round_id` once that round resolved.
    pub fn record_outcome(
        &mut self,
        round_id: u64,
        predicted: Option<OutcomeClass>,
        tier_was_actionable: bool,
        actual: OutcomeClass,
    ) -> Option<Outcome> {
        self.streak
            .record_outcome(round_id, predicted, tier_was_actionable, actual)
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
