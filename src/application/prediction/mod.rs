//! Next-round prediction
//!
//! `pattern` answers "what historically followed the newest d classes" per
//! depth, `vote` folds the depth answers into one label and strength,
//! `signals` holds the volatility and symmetry gates, and `engine` runs the
//! decision tree over all of them.

pub mod engine;
pub mod pattern;
pub mod signals;
pub mod vote;

pub use engine::{Assessment, PredictionEngine};
pub use pattern::PatternSignal;
pub use vote::Vote;
