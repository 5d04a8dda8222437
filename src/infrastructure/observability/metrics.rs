//! Prometheus metrics definitions for roundcast
//!
//! All metrics use the `roundcast_` prefix and are read-only.

use crate::application::monitoring::StatusSnapshot;
use crate::domain::prediction::Tier;
use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the poller and predictor
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Rounds currently retained in the history store
    pub history_size: GenericGauge<AtomicF64>,
    /// Rounds newly accepted into the history store
    pub rounds_ingested_total: IntCounter,
    /// Predictions issued by tier
    pub predictions_total: CounterVec,
    /// Scored actionable predictions
    pub wins: GenericGauge<AtomicF64>,
    pub losses: GenericGauge<AtomicF64>,
    /// Current run of losses (recovery mode gate)
    pub consecutive_losses: GenericGauge<AtomicF64>,
    /// Current win rate (0-1)
    pub win_rate_current: GenericGauge<AtomicF64>,
    /// Feed failures by operation
    pub feed_errors_total: CounterVec,
    /// Feed request latency in seconds
    pub feed_latency_seconds: HistogramVec,
    /// Failed repository writes
    pub storage_errors_total: IntCounter,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let history_size = Gauge::with_opts(Opts::new(
            "roundcast_history_size",
            "Rounds retained in the history store",
        ))?;
        registry.register(Box::new(history_size.clone()))?;

        let rounds_ingested_total = IntCounter::with_opts(Opts::new(
            "roundcast_rounds_ingested_total",
            "Rounds newly accepted into the history store",
        ))?;
        registry.register(Box::new(rounds_ingested_total.clone()))?;

        let predictions_total = CounterVec::new(
            Opts::new("roundcast_predictions_total", "Predictions issued by tier"),
            &["tier"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let wins = Gauge::with_opts(Opts::new(
            "roundcast_wins",
            "Actionable predictions that matched the round",
        ))?;
        registry.register(Box::new(wins.clone()))?;

        let losses = Gauge::with_opts(Opts::new(
            "roundcast_losses",
            "Actionable predictions that missed the round",
        ))?;
        registry.register(Box::new(losses.clone()))?;

        let consecutive_losses = Gauge::with_opts(Opts::new(
            "roundcast_consecutive_losses",
            "Current run of losses",
        ))?;
        registry.register(Box::new(consecutive_losses.clone()))?;

        let win_rate_current = Gauge::with_opts(Opts::new(
            "roundcast_win_rate_current",
            "Current win rate (0-1)",
        ))?;
        registry.register(Box::new(win_rate_current.clone()))?;

        let feed_errors_total = CounterVec::new(
            Opts::new("roundcast_feed_errors_total", "Feed failures by operation"),
            &["operation"],
        )?;
        registry.register(Box::new(feed_errors_total.clone()))?;

        let feed_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "roundcast_feed_latency_seconds",
                "Feed request latency in seconds",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["operation"],
        )?;
        registry.register(Box::new(feed_latency_seconds.clone()))?;

        let storage_errors_total = IntCounter::with_opts(Opts::new(
            "roundcast_storage_errors_total",
            "Failed repository writes",
        ))?;
        registry.register(Box::new(storage_errors_total.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "roundcast_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            history_size,
            rounds_ingested_total,
            predictions_total,
            wins,
            losses,
            consecutive_losses,
            win_rate_current,
            feed_errors_total,
            feed_latency_seconds,
            storage_errors_total,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_prediction(&self, tier: Tier) {
        self.predictions_total
            .with_label_values(&[tier.as_str()])
            .inc();
    }

    pub fn inc_feed_error(&self, operation: &str) {
        self.feed_errors_total.with_label_values(&[operation]).inc();
    }

    /// Copy session gauges from a status snapshot
    pub fn update_from_snapshot(&self, snapshot: &StatusSnapshot) {
        self.history_size.set(snapshot.history_size as f64);
        self.wins.set(snapshot.wins as f64);
        self.losses.set(snapshot.losses as f64);
        self.consecutive_losses
            .set(f64::from(snapshot.consecutive_losses));
        if let Some(rate) = snapshot.win_rate {
            self.win_rate_current.set(rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        assert!(metrics.render().contains("roundcast_"));
    }

    #[test]
    fn test_history_size_update() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.history_size.set(640.0);
        let output = metrics.render();
        assert!(output.contains("roundcast_history_size 640"));
    }

    #[test]
    fn test_prediction_counter_by_tier() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_prediction(Tier::Sureshot);
        metrics.inc_prediction(Tier::Sureshot);
        metrics.inc_prediction(Tier::Waiting);
        let output = metrics.render();
        assert!(output.contains("roundcast_predictions_total{tier=\"SURESHOT\"} 2"));
        assert!(output.contains("tier=\"WAITING\""));
    }

    #[test]
    fn test_feed_error_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_feed_error("poll");
        let output = metrics.render();
        assert!(output.contains("roundcast_feed_errors_total{operation=\"poll\"} 1"));
    }
}
