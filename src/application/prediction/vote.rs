use crate::application::prediction::pattern::PatternSignal;
use crate::domain::round::OutcomeClass;

/// Combined label after weighting every depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vote {
    pub label: OutcomeClass,
    /// Winning weighted total divided by the vote divisor; can exceed 1.0
    pub strength: f64,
    /// True when no depth contributed and the fallback label was used
    pub fallback: bool,
}

/// Folds per-depth signals into one vote.
///
/// Each `(signal, weight)` adds `strength * weight` to its label's total, in
/// the order given. Depths without a label add nothing. If both totals are
/// zero the vote falls back to `fallback_label` at `fallback_strength`.
pub fn weighted_vote(
    signals: &[(PatternSignal, f64)],
    divisor: f64,
    tie_break: OutcomeClass,
    fallback_label: OutcomeClass,
    fallback_strength: f64,
) -> Vote {
    let mut high_total = 0.0_f64;
    let mut low_total = 0.0_f64;

    for (signal, weight) in signals {
        match signal.label {
            Some(OutcomeClass::High) => high_total += signal.strength * weight,
            Some(OutcomeClass::Low) => low_total += signal.strength * weight,
            None => {}
        }
    }

    if high_total == 0.0 && low_total == 0.0 {
        return Vote {
            label: fallback_label,
            strength: fallback_strength,
            fallback: true,
        };
    }

    let (label, total) = if high_total > low_total {
        (OutcomeClass::High, high_total)
    } else if low_total > high_total {
        (OutcomeClass::Low, low_total)
    } else {
        (tie_break, high_total)
    };

    Vote {
        label,
        strength: total / divisor,
        fallback: false,
    }
}
