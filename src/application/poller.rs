use crate::application::session::{PredictionSession, TickReport};
use crate::domain::ports::ResultFeed;
use crate::domain::repositories::RoundRepository;
use crate::domain::round::Round;
use crate::infrastructure::observability::{LatencyGuard, Metrics};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum PollerCommand {
    Shutdown,
}

/// Timing and paging for the poll loop.
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub page_size: u32,
    pub backfill_pages: u32,
    pub poll_interval: Duration,
    pub error_backoff: Duration,
    /// Rounds to restore from the repository at startup
    pub restore_limit: usize,
}

/// Single writer of the prediction session.
///
/// Each tick fetches the newest page, folds it into the session and persists
/// the rounds that were new. Feed failures leave the session untouched and
/// delay the next tick by the error backoff.
pub struct RoundPoller {
    feed: Arc<dyn ResultFeed>,
    repository: Arc<dyn RoundRepository>,
    session: Arc<RwLock<PredictionSession>>,
    metrics: Metrics,
    settings: PollerSettings,
    cmd_rx: Option<Receiver<PollerCommand>>,
}

impl RoundPoller {
    pub fn new(
        feed: Arc<dyn ResultFeed>,
        repository: Arc<dyn RoundRepository>,
        session: Arc<RwLock<PredictionSession>>,
        metrics: Metrics,
        settings: PollerSettings,
        cmd_rx: Option<Receiver<PollerCommand>>,
    ) -> Self {
        Self {
            feed,
            repository,
            session,
            metrics,
            settings,
            cmd_rx,
        }
    }

    /// Loads persisted history into the session.
    pub async fn restore(&self) -> Result<usize> {
        let rounds = self
            .repository
            .load_recent(self.settings.restore_limit)
            .await
            .context("Failed to load persisted rounds")?;
        let restored = self.session.write().await.seed(rounds).len();
        if restored > 0 {
            info!("RoundPoller: restored {} rounds from storage", restored);
        }
        Ok(restored)
    }

    /// Fetches the configured number of pages and seeds the session.
    ///
    /// Failed pages are logged and skipped. Returns the number of new rounds.
    pub async fn backfill(&self) -> usize {
        let mut rounds: Vec<Round> = Vec::new();

        for page_no in 1..=self.settings.backfill_pages {
            let page = {
                let _latency = LatencyGuard::feed(&self.metrics, "backfill");
                self.feed.fetch_page(page_no, self.settings.page_size).await
            };
            match page {
                Ok(page) => {
                    debug!("RoundPoller: backfill page {} returned {} rounds", page_no, page.len());
                    rounds.extend(page);
                }
                Err(e) => {
                    self.metrics.inc_feed_error("backfill");
                    warn!("RoundPoller: backfill page {} failed: {:#}", page_no, e);
                }
            }
        }

        rounds.sort_by_key(Round::id);
        rounds.dedup_by_key(|round| round.id());

        let inserted = self.session.write().await.seed(rounds);
        self.persist(&inserted).await;
        self.metrics.rounds_ingested_total.inc_by(inserted.len() as u64);
        info!("RoundPoller: backfill added {} rounds", inserted.len());
        inserted.len()
    }

    /// One poll: fetch the newest page and fold it into the session.
    pub async fn tick(&self) -> Result<TickReport> {
        let page = {
            let _latency = LatencyGuard::feed(&self.metrics, "poll");
            self.feed.fetch_page(1, self.settings.page_size).await
        };
        let page = match page {
            Ok(page) => page,
            Err(e) => {
                self.metrics.inc_feed_error("poll");
                return Err(e.context("Failed to poll result feed"));
            }
        };

        let (report, snapshot) = {
            let mut session = self.session.write().await;
            let report = session.ingest(page);
            (report, session.snapshot())
        };

        self.persist(&report.inserted).await;
        self.metrics
            .rounds_ingested_total
            .inc_by(report.inserted.len() as u64);
        if let Some(issued) = &report.issued {
            self.metrics.inc_prediction(issued.prediction.tier);
        }
        self.metrics.update_from_snapshot(&snapshot);

        Ok(report)
    }

    /// Storage failures never stop polling; the rounds stay in memory.
    async fn persist(&self, rounds: &[Round]) {
        if rounds.is_empty() {
            return;
        }
        if let Err(e) = self.repository.save_all(rounds).await {
            self.metrics.storage_errors_total.inc();
            warn!("RoundPoller: failed to persist {} rounds: {:#}", rounds.len(), e);
        }
    }

    pub async fn run(mut self) {
        if let Err(e) = self.restore().await {
            warn!("RoundPoller: {:#}", e);
        }
        self.backfill().await;

        info!(
            "RoundPoller: polling every {:?} (page size {})",
            self.settings.poll_interval, self.settings.page_size
        );

        let mut delay = Duration::ZERO;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    delay = match self.tick().await {
                        Ok(report) => {
                            if !report.inserted.is_empty() {
                                debug!("RoundPoller: {} new rounds", report.inserted.len());
                            }
                            self.settings.poll_interval
                        }
                        Err(e) => {
                            warn!("RoundPoller: {:#}. Retrying in {:?}", e, self.settings.error_backoff);
                            self.settings.error_backoff
                        }
                    };
                }

                maybe_cmd = async {
                    if let Some(rx) = &mut self.cmd_rx {
                        rx.recv().await
                    } else {
                        std::future::pending().await
                    }
                } => {
                    match maybe_cmd {
                        Some(PollerCommand::Shutdown) => {
                            info!("RoundPoller received Shutdown command. Exiting loop.");
                            return;
                        }
                        None => {
                            // Sender dropped; keep polling without commands
                            self.cmd_rx = None;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::EngineConfig;
    use crate::domain::prediction::Tier;
    use crate::infrastructure::mock::ScriptedResultFeed;
    use crate::infrastructure::repositories::InMemoryRoundRepository;

    fn rounds(ids: std::ops::RangeInclusive<u64>) -> Vec<Round> {
        ids.map(|id| Round::new(id, (id % 10) as u8).unwrap()).collect()
    }

    fn settings() -> PollerSettings {
        PollerSettings {
            page_size: 10,
            backfill_pages: 2,
            poll_interval: Duration::from_millis(10),
            error_backoff: Duration::from_millis(20),
            restore_limit: 100,
        }
    }

    fn poller(
        feed: Arc<ScriptedResultFeed>,
        repository: Arc<InMemoryRoundRepository>,
    ) -> (RoundPoller, Arc<RwLock<PredictionSession>>) {
        let session = Arc::new(RwLock::new(PredictionSession::new(
            EngineConfig::default(),
            100,
            10,
        )));
        let poller = RoundPoller::new(
            feed,
            repository,
            session.clone(),
            Metrics::new().unwrap(),
            settings(),
            None,
        );
        (poller, session)
    }

    #[tokio::test]
    async fn test_backfill_sorts_dedups_and_persists() {
        let feed = Arc::new(ScriptedResultFeed::new());
        feed.push_page(rounds(11..=20));
        feed.push_page(rounds(5..=12));
        let repository = Arc::new(InMemoryRoundRepository::new());
        let (poller, session) = poller(feed, repository.clone());

        assert_eq!(poller.backfill().await, 16);

        let session = session.read().await;
        let ids: Vec<u64> = session.store().snapshot().iter().map(Round::id).collect();
        assert_eq!(ids, (5..=20).collect::<Vec<_>>());
        assert_eq!(repository.count().await.unwrap(), 16);
    }

    #[tokio::test]
    async fn test_backfill_skips_failed_pages() {
        let feed = Arc::new(ScriptedResultFeed::new());
        feed.push_error("page unavailable");
        feed.push_page(rounds(1..=4));
        let repository = Arc::new(InMemoryRoundRepository::new());
        let (poller, _) = poller(feed, repository);

        assert_eq!(poller.backfill().await, 4);
        assert!(poller.metrics.render().contains("operation=\"backfill\"} 1"));
    }

    #[tokio::test]
    async fn test_tick_failure_leaves_session_untouched() {
        let feed = Arc::new(ScriptedResultFeed::new());
        feed.push_page(rounds(1..=3));
        feed.push_error("timeout");
        let repository = Arc::new(InMemoryRoundRepository::new());
        let (poller, session) = poller(feed, repository);

        let report = poller.tick().await.unwrap();
        assert_eq!(report.issued.unwrap().prediction.tier, Tier::Syncing);
        let before = session.read().await.snapshot();

        assert!(poller.tick().await.is_err());
        assert_eq!(session.read().await.snapshot(), before);
    }

    #[tokio::test]
    async fn test_restore_seeds_from_repository() {
        let repository = Arc::new(InMemoryRoundRepository::new());
        repository.save_all(&rounds(1..=30)).await.unwrap();
        let (poller, session) = poller(Arc::new(ScriptedResultFeed::new()), repository);

        assert_eq!(poller.restore().await.unwrap(), 30);
        assert_eq!(session.read().await.store().len(), 30);
        assert!(session.read().await.pending().is_none());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let feed = Arc::new(ScriptedResultFeed::new());
        let repository = Arc::new(InMemoryRoundRepository::new());
        let session = Arc::new(RwLock::new(PredictionSession::new(
            EngineConfig::default(),
            100,
            10,
        )));
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let poller = RoundPoller::new(
            feed,
            repository,
            session,
            Metrics::new().unwrap(),
            settings(),
            Some(rx),
        );

        let handle = tokio::spawn(poller.run());
        tx.send(PollerCommand::Shutdown).await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
    }
}
