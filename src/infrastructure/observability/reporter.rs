//! Push-based status reporter
//!
//! Periodically prints the session status as structured JSON to stdout.

use crate::application::monitoring::StatusSnapshot;
use crate::application::session::PredictionSession;
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// One `STATUS_JSON:` line
#[derive(Serialize)]
pub struct StatusReport {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub status: StatusSnapshot,
}

/// Outputs the session status on a fixed interval.
/// No HTTP server, no incoming connections.
pub struct StatusReporter {
    session: Arc<RwLock<PredictionSession>>,
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl StatusReporter {
    pub fn new(
        session: Arc<RwLock<PredictionSession>>,
        metrics: Metrics,
        interval_seconds: u64,
    ) -> Self {
        Self {
            session,
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    pub async fn run(self) {
        info!(
            "StatusReporter: Starting push-based status output (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let report = self.collect_report().await;
            match serde_json::to_string(&report) {
                Ok(json) => {
                    println!("STATUS_JSON:{}", json);
                    info!("{}", report.status.headline());
                }
                Err(e) => warn!("Failed to serialize status: {}", e),
            }
        }
    }

    async fn collect_report(&self) -> StatusReport {
        let status = self.session.read().await.snapshot();
        let uptime = self.start_time.elapsed().as_secs();

        self.metrics.uptime_seconds.set(uptime as f64);
        self.metrics.update_from_snapshot(&status);

        StatusReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::EngineConfig;
    use crate::domain::prediction::Tier;
    use crate::domain::round::Round;

    #[tokio::test]
    async fn test_report_collection() {
        let mut session = PredictionSession::new(EngineConfig::default(), 100, 10);
        session.ingest((1..=3).map(|id| Round::new(id, 4).unwrap()));
        let session = Arc::new(RwLock::new(session));
        let metrics = Metrics::new().expect("Failed to create metrics");
        let reporter = StatusReporter::new(session, metrics.clone(), 30);

        let report = reporter.collect_report().await;
        assert_eq!(report.status.history_size, 3);
        assert_eq!(report.status.period, Some(4));
        assert_eq!(report.status.tier, Tier::Syncing);
        assert!(!report.timestamp.is_empty());
        assert!(metrics.render().contains("roundcast_history_size 3"));
    }

    #[tokio::test]
    async fn test_report_serialization() {
        let session = Arc::new(RwLock::new(PredictionSession::new(
            EngineConfig::default(),
            100,
            10,
        )));
        let reporter = StatusReporter::new(session, Metrics::new().unwrap(), 30);

        let json = serde_json::to_string(&reporter.collect_report().await)
            .expect("Failed to serialize");
        assert!(json.contains("\"status\":{"));
        assert!(json.contains("\"tier\":\"SYNCING\""));
        assert!(json.contains("\"period\":null"));
    }
}
