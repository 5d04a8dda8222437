use crate::domain::round::OutcomeClass;

/// What one depth's backtest says about the next round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternSignal {
    pub depth: usize,
    pub label: Option<OutcomeClass>,
    /// Share of matches that agree with `label` (0.0 without matches)
    pub strength: f64,
    pub matches: usize,
}

impl PatternSignal {
    fn empty(depth: usize) -> Self {
        Self {
            depth,
            label: None,
            strength: 0.0,
            matches: 0,
        }
    }
}

/// Backtests the newest `depth` classes against the whole history.
///
/// Every earlier window equal to the query contributes the class that followed
/// it. The final window is the query itself and has no successor yet, so it is
/// never counted. Equal counts resolve to `tie_break`.
pub fn scan_depth(classes: &[OutcomeClass], depth: usize, tie_break: OutcomeClass) -> PatternSignal {
    if depth == 0 || classes.len() <= depth {
        return PatternSignal::empty(depth);
    }

    let query = &classes[classes.len() - depth..];
    let (mut high, mut low) = (0usize, 0usize);

    for window in classes.windows(depth + 1) {
        if &window[..depth] == query {
            match window[depth] {
                OutcomeClass::High => high += 1,
                OutcomeClass::Low => low += 1,
            }
        }
    }

    let total = high + low;
    if total == 0 {
        return PatternSignal::empty(depth);
    }

    let (label, count) = match high.cmp(&low) {
        std::cmp::Ordering::Greater => (OutcomeClass::High, high),
        std::cmp::Ordering::Less => (OutcomeClass::Low, low),
        std::cmp::Ordering::Equal => (tie_break, high),
    };

    PatternSignal {
        depth,
        label: Some(label),
        strength: count as f64 / total as f64,
        matches: total,
    }
}
