use crate::infrastructure::observability::Metrics;
use prometheus::Histogram;
use std::time::Instant;

/// Observes the elapsed time into a histogram when dropped
pub struct LatencyGuard {
    start: Instant,
    histogram: Histogram,
}

impl LatencyGuard {
    pub fn new(histogram: Histogram) -> Self {
        Self {
            start: Instant::now(),
            histogram,
        }
    }

    /// Times one feed call labelled by `operation`
    pub fn feed(metrics: &Metrics, operation: &str) -> Self {
        Self::new(
            metrics
                .feed_latency_seconds
                .with_label_values(&[operation]),
        )
    }
}

impl Drop for LatencyGuard {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
