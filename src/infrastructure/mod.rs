pub mod core;
pub mod feed;
pub mod mock;
pub mod observability;
pub mod persistence;
pub mod repositories;

pub use feed::HttpResultFeed;
pub use mock::{ScriptedResultFeed, SimulatedResultFeed};
pub use repositories::InMemoryRoundRepository;
