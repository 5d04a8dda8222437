use crate::domain::config::EngineConfig;
use crate::domain::round::Round;

/// True when the newest round landed on an unstable digit.
pub fn unstable_trigger(history: &[Round], config: &EngineConfig) -> bool {
    history
        .last()
        .is_some_and(|round| config.is_unstable(round.number()))
}

/// True when the share of unstable rounds in the trailing window exceeds the ratio.
///
/// Histories shorter than the window never count as volatile.
pub fn volatile_window(history: &[Round], config: &EngineConfig) -> bool {
    let window = config.volatility_window;
    if window == 0 || history.len() < window {
        return false;
    }

    let unstable = history[history.len() - window..]
        .iter()
        .filter(|round| config.is_unstable(round.number()))
        .count();

    unstable as f64 / window as f64 > config.volatility_ratio
}

/// Digit symmetry of the two newest rounds: they sum to 9 or repeat.
pub fn symmetric(history: &[Round]) -> bool {
    match history {
        [.., older, newest] => {
            let (n1, n2) = (newest.number(), older.number());
            n1 + n2 == 9 || n1 == n2
        }
        _ => false,
    }
}
