// Round history and the prediction engine
pub mod history;
pub mod prediction;

// Session state, polling and offline replay
pub mod backtest;
pub mod poller;
pub mod session;

// Status surface
pub mod monitoring;

// System orchestrator
pub mod bootstrap;
pub mod system;
