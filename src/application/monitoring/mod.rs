// Status surface handed to reporters
pub mod status;

pub use status::{OutcomeLogEntry, StatusSnapshot};
