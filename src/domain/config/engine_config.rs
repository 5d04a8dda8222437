//! Engine Configuration Domain Value Object
//!
//! This module defines the `EngineConfig` value object, which holds every
//! threshold the prediction engine consults, with validation logic.
//!
//! # Design Principles
//!
//! - **One engine, many tunings**: threshold variants are named profiles, not copies
//! - **Self-Validation**: `validate()` runs on every construction path
//! - **Layered overrides**: profile defaults, then a TOML file, then env vars

use crate::domain::round::OutcomeClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for EngineConfig validation
#[derive(Debug, Error, PartialEq)]
pub enum EngineConfigError {
    #[error("Invalid threshold: {field} = {value}. Must be finite and non-negative")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid ratio: {field} = {value}. Must be between 0.0 and 1.0")]
    InvalidRatio { field: String, value: f64 },

    #[error("Invalid limit: {field} = {value}. Must be at least {min}")]
    InvalidLimit { field: String, value: usize, min: usize },

    #[error("Invalid depth weight for depth {depth}: {weight}")]
    InvalidDepthWeight { depth: usize, weight: f64 },

    #[error("No pattern depths configured")]
    NoDepths,

    #[error("Duplicate pattern depth: {0}")]
    DuplicateDepth(usize),
}

/// Named threshold tunings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdProfile {
    #[default]
    Standard,
    /// Standard with a stricter HIGH tier (0.85)
    Strict,
}

impl ThresholdProfile {
    pub const ALL: [ThresholdProfile; 2] = [ThresholdProfile::Standard, ThresholdProfile::Strict];
}

impl fmt::Display for ThresholdProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdProfile::Standard => write!(f, "standard"),
            ThresholdProfile::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ThresholdProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(ThresholdProfile::Standard),
            "strict" => Ok(ThresholdProfile::Strict),
            _ => anyhow::bail!(
                "Invalid ENGINE_PROFILE: {}. Must be 'standard' or 'strict'",
                s
            ),
        }
    }
}

/// Pattern depth and the weight its vote carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthWeight {
    pub depth: usize,
    pub weight: f64,
}

impl DepthWeight {
    pub const fn new(depth: usize, weight: f64) -> Self {
        Self { depth, weight }
    }
}

/// Prediction engine thresholds
///
/// # Invariants
///
/// - All strength thresholds are finite and non-negative (vote strength can exceed 1.0)
/// - `volatility_ratio` is in [0.0, 1.0]
/// - `min_history >= 2` (symmetry reads the two newest rounds)
/// - `volatility_window >= 1`, `recovery_loss_streak >= 1`
/// - At least one depth, each `>= 1`, unique, with a finite non-negative weight
/// - `vote_divisor > 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    /// Fewer rounds than this yields SYNCING
    pub min_history: usize,
    /// Strength needed to bet right after an unstable round
    pub sureshot_safe_min: f64,
    pub sureshot_min: f64,
    pub high_min: f64,
    pub low_min: f64,
    pub low_tier_enabled: bool,
    pub recovery_min: f64,
    /// Consecutive losses that switch on recovery mode
    pub recovery_loss_streak: u32,
    pub volatility_window: usize,
    pub volatility_ratio: f64,
    /// Digits that mark a round as unstable
    pub unstable_numbers: Vec<u8>,
    pub depths: Vec<DepthWeight>,
    /// Divides the winning weighted total into the reported strength
    pub vote_divisor: f64,
    /// Strength used when no depth matched anything
    pub fallback_strength: f64,
    /// Label chosen when one depth's match counts are equal
    pub tie_break: OutcomeClass,
    /// Label chosen when the weighted vote totals are equal
    pub vote_tie_break: OutcomeClass,
}

impl EngineConfig {
    pub fn for_profile(profile: ThresholdProfile) -> Self {
        let standard = Self {
            min_history: 15,
            sureshot_safe_min: 0.92,
            sureshot_min: 0.90,
            high_min: 0.65,
            low_min: 0.60,
            low_tier_enabled: true,
            recovery_min: 0.60,
            recovery_loss_streak: 2,
            volatility_window: 20,
            volatility_ratio: 0.25,
            unstable_numbers: vec![0, 5],
            depths: vec![
                DepthWeight::new(3, 1.0),
                DepthWeight::new(4, 1.2),
                DepthWeight::new(5, 1.5),
            ],
            vote_divisor: 3.0,
            fallback_strength: 0.5,
            tie_break: OutcomeClass::High,
            vote_tie_break: OutcomeClass::Low,
        };

        match profile {
            ThresholdProfile::Standard => standard,
            ThresholdProfile::Strict => Self {
                high_min: 0.85,
                ..standard
            },
        }
    }

    /// Applies overrides on top of `self` and validates the result.
    pub fn with_overrides(mut self, overrides: &EngineOverrides) -> Result<Self, EngineConfigError> {
        if let Some(value) = &overrides.min_history {
            self.min_history = *value;
        }
        if let Some(value) = &overrides.sureshot_safe_min {
            self.sureshot_safe_min = *value;
        }
        if let Some(value) = &overrides.sureshot_min {
            self.sureshot_min = *value;
        }
        if let Some(value) = &overrides.high_min {
            self.high_min = *value;
        }
        if let Some(value) = &overrides.low_min {
            self.low_min = *value;
        }
        if let Some(value) = &overrides.low_tier_enabled {
            self.low_tier_enabled = *value;
        }
        if let Some(value) = &overrides.recovery_min {
            self.recovery_min = *value;
        }
        if let Some(value) = &overrides.recovery_loss_streak {
            self.recovery_loss_streak = *value;
        }
        if let Some(value) = &overrides.volatility_window {
            self.volatility_window = *value;
        }
        if let Some(value) = &overrides.volatility_ratio {
            self.volatility_ratio = *value;
        }
        if let Some(value) = &overrides.unstable_numbers {
            self.unstable_numbers = value.clone();
        }
        if let Some(value) = &overrides.depths {
            self.depths = value.clone();
        }
        if let Some(value) = &overrides.vote_divisor {
            self.vote_divisor = *value;
        }
        if let Some(value) = &overrides.fallback_strength {
            self.fallback_strength = *value;
        }
        if let Some(value) = &overrides.tie_break {
            self.tie_break = *value;
        }
        if let Some(value) = &overrides.vote_tie_break {
            self.vote_tie_break = *value;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate all invariants
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        for (field, value) in [
            ("sureshot_safe_min", self.sureshot_safe_min),
            ("sureshot_min", self.sureshot_min),
            ("high_min", self.high_min),
            ("low_min", self.low_min),
            ("recovery_min", self.recovery_min),
            ("fallback_strength", self.fallback_strength),
        ] {
            Self::validate_threshold(field, value)?;
        }

        if !(0.0..=1.0).contains(&self.volatility_ratio) {
            return Err(EngineConfigError::InvalidRatio {
                field: "volatility_ratio".to_string(),
                value: self.volatility_ratio,
            });
        }

        Self::validate_limit("min_history", self.min_history, 2)?;
        Self::validate_limit("volatility_window", self.volatility_window, 1)?;
        Self::validate_limit("recovery_loss_streak", self.recovery_loss_streak as usize, 1)?;

        if !(self.vote_divisor.is_finite() && self.vote_divisor > 0.0) {
            return Err(EngineConfigError::InvalidThreshold {
                field: "vote_divisor".to_string(),
                value: self.vote_divisor,
            });
        }

        if self.depths.is_empty() {
            return Err(EngineConfigError::NoDepths);
        }
        for (i, dw) in self.depths.iter().enumerate() {
            Self::validate_limit("depth", dw.depth, 1)?;
            if !(dw.weight.is_finite() && dw.weight >= 0.0) {
                return Err(EngineConfigError::InvalidDepthWeight {
                    depth: dw.depth,
                    weight: dw.weight,
                });
            }
            if self.depths[..i].iter().any(|other| other.depth == dw.depth) {
                return Err(EngineConfigError::DuplicateDepth(dw.depth));
            }
        }

        Ok(())
    }

    pub fn is_unstable(&self, number: u8) -> bool {
        self.unstable_numbers.contains(&number)
    }

    fn validate_threshold(field: &str, value: f64) -> Result<(), EngineConfigError> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(EngineConfigError::InvalidThreshold {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn validate_limit(field: &str, value: usize, min: usize) -> Result<(), EngineConfigError> {
        if value < min {
            return Err(EngineConfigError::InvalidLimit {
                field: field.to_string(),
                value,
                min,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_profile(ThresholdProfile::Standard)
    }
}

/// Partial engine settings, as read from a TOML file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineOverrides {
    pub min_history: Option<usize>,
    pub sureshot_safe_min: Option<f64>,
    pub sureshot_min: Option<f64>,
    pub high_min: Option<f64>,
    pub low_min: Option<f64>,
    pub low_tier_enabled: Option<bool>,
    pub recovery_min: Option<f64>,
    pub recovery_loss_streak: Option<u32>,
    pub volatility_window: Option<usize>,
    pub volatility_ratio: Option<f64>,
    pub unstable_numbers: Option<Vec<u8>>,
    pub depths: Option<Vec<DepthWeight>>,
    pub vote_divisor: Option<f64>,
    pub fallback_strength: Option<f64>,
    pub tie_break: Option<OutcomeClass>,
    pub vote_tie_break: Option<OutcomeClass>,
}

impl EngineOverrides {
    /// Later values win field by field.
    pub fn merge(self, other: EngineOverrides) -> Self {
        Self {
            min_history: other.min_history.or(self.min_history),
            sureshot_safe_min: other.sureshot_safe_min.or(self.sureshot_safe_min),
            sureshot_min: other.sureshot_min.or(self.sureshot_min),
            high_min: other.high_min.or(self.high_min),
            low_min: other.low_min.or(self.low_min),
            low_tier_enabled: other.low_tier_enabled.or(self.low_tier_enabled),
            recovery_min: other.recovery_min.or(self.recovery_min),
            recovery_loss_streak: other.recovery_loss_streak.or(self.recovery_loss_streak),
            volatility_window: other.volatility_window.or(self.volatility_window),
            volatility_ratio: other.volatility_ratio.or(self.volatility_ratio),
            unstable_numbers: other.unstable_numbers.or(self.unstable_numbers),
            depths: other.depths.or(self.depths),
            vote_divisor: other.vote_divisor.or(self.vote_divisor),
            fallback_strength: other.fallback_strength.or(self.fallback_strength),
            tie_break: other.tie_break.or(self.tie_break),
            vote_tie_break: other.vote_tie_break.or(self.vote_tie_break),
        }
    }
}
