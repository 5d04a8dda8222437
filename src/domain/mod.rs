// Engine tuning value objects
pub mod config;

// Domain-specific error types
pub mod errors;

// Port interfaces
pub mod ports;

// Engine output
pub mod prediction;

// Repository traits
pub mod repositories;

// Observed rounds
pub mod round;

// Win/loss tracking
pub mod streak;
