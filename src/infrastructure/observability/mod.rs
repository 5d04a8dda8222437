//! Push-based observability for roundcast
//!
//! Nothing here listens for requests. Status leaves the process as:
//!
//! 1. **Structured JSON lines** on stdout (`STATUS_JSON:` prefix)
//! 2. **Prometheus metrics** kept in an in-process registry and rendered on demand

pub mod latency_tracker;
pub mod metrics;
pub mod reporter;

pub use latency_tracker::LatencyGuard;
pub use metrics::Metrics;
pub use reporter::StatusReporter;
