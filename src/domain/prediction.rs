use crate::domain::round::OutcomeClass;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence/action tier attached to every prediction.
///
/// Skip and waiting tiers are how the engine reports "no bet"; it never
/// returns an error for well-formed history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Not enough history yet
    Syncing,
    /// Most recent round was unstable and the pattern was not strong enough
    SkipUnstable,
    /// Most recent round was unstable but the pattern cleared the strict bar
    SureshotSafe,
    Recovery,
    SkipRecovery,
    Sureshot,
    High,
    WaitingVolatile,
    Low,
    Waiting,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::Syncing,
        Tier::SkipUnstable,
        Tier::SureshotSafe,
        Tier::Recovery,
        Tier::SkipRecovery,
        Tier::Sureshot,
        Tier::High,
        Tier::WaitingVolatile,
        Tier::Low,
        Tier::Waiting,
    ];

    /// Whether a prediction in this tier counts towards wins and losses.
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            Tier::SureshotSafe | Tier::Recovery | Tier::Sureshot | Tier::High | Tier::Low
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Syncing => "SYNCING",
            Tier::SkipUnstable => "SKIP_UNSTABLE",
            Tier::SureshotSafe => "SURESHOT_SAFE",
            Tier::Recovery => "RECOVERY",
            Tier::SkipRecovery => "SKIP_RECOVERY",
            Tier::Sureshot => "SURESHOT",
            Tier::High => "HIGH",
            Tier::WaitingVolatile => "WAITING_VOLATILE",
            Tier::Low => "LOW",
            Tier::Waiting => "WAITING",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine output for the next round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Option<OutcomeClass>,
    pub tier: Tier,
    /// Weighted vote strength behind the label (0.0 while syncing)
    pub strength: f64,
}

impl Prediction {
    pub fn bet(label: OutcomeClass, tier: Tier, strength: f64) -> Self {
        Self {
            label: Some(label),
            tier,
            strength,
        }
    }

    pub fn skip(tier: Tier, strength: f64) -> Self {
        Self {
            label: None,
            tier,
            strength,
        }
    }

    pub fn syncing() -> Self {
        Self::skip(Tier::Syncing, 0.0)
    }

    pub fn is_actionable(&self) -> bool {
        self.label.is_some() && self.tier.is_actionable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actionable_tiers() {
        let actionable: Vec<Tier> = Tier::ALL
            .iter()
            .copied()
            .filter(Tier::is_actionable)
            .collect();
        assert_eq!(
            actionable,
            vec![Tier::SureshotSafe, Tier::Recovery, Tier::Sureshot, Tier::High, Tier::Low]
        );
    }

    #[test]
    fn test_tier_serializes_as_label() {
        let json = serde_json::to_string(&Tier::WaitingVolatile).unwrap();
        assert_eq!(json, "\"WAITING_VOLATILE\"");
        assert_eq!(Tier::SureshotSafe.to_string(), "SURESHOT_SAFE");
    }

    #[test]
    fn test_skip_prediction_is_not_actionable() {
        assert!(!Prediction::syncing().is_actionable());
        assert!(Prediction::bet(OutcomeClass::High, Tier::High, 0.7).is_actionable());
    }
}
