use roundcast::application::poller::{PollerCommand, PollerSettings, RoundPoller};
use roundcast::application::session::PredictionSession;
use roundcast::domain::config::EngineConfig;
use roundcast::domain::prediction::Tier;
use roundcast::domain::repositories::RoundRepository;
use roundcast::domain::round::Round;
use roundcast::infrastructure::observability::Metrics;
use roundcast::infrastructure::{InMemoryRoundRepository, ScriptedResultFeed};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use tokio_test::assert_ok;

fn rounds(ids: std::ops::RangeInclusive<u64>) -> Vec<Round> {
    ids.map(|id| Round::new(id, (id * 7 % 10) as u8).unwrap())
        .collect()
}

fn newest_first(ids: std::ops::RangeInclusive<u64>) -> Vec<Round> {
    let mut page = rounds(ids);
    page.reverse();
    page
}

fn settings() -> PollerSettings {
    PollerSettings {
        page_size: 10,
        backfill_pages: 1,
        poll_interval: Duration::from_millis(5),
        error_backoff: Duration::from_millis(5),
        restore_limit: 50,
    }
}

fn new_session() -> Arc<RwLock<PredictionSession>> {
    Arc::new(RwLock::new(PredictionSession::new(
        EngineConfig::default(),
        50,
        10,
    )))
}

#[tokio::test]
async fn test_restore_then_poll_resumes_predicting() {
    let repository = Arc::new(InMemoryRoundRepository::new());
    assert_ok!(repository.save_all(&rounds(1..=30)).await);

    let feed = Arc::new(ScriptedResultFeed::new());
    feed.push_page(newest_first(25..=32));

    let session = new_session();
    let poller = RoundPoller::new(
        feed.clone(),
        repository.clone(),
        session.clone(),
        Metrics::new().unwrap(),
        settings(),
        None,
    );

    assert_eq!(assert_ok!(poller.restore().await), 30);
    assert!(session.read().await.pending().is_none());

    let report = assert_ok!(poller.tick().await);
    let inserted: Vec<u64> = report.inserted.iter().map(Round::id).collect();
    assert_eq!(inserted, vec![31, 32]);
    let issued = report.issued.unwrap();
    assert_eq!(issued.target_id, 33);
    assert_ne!(issued.prediction.tier, Tier::Syncing);

    assert_eq!(assert_ok!(repository.count().await), 32);
    assert_eq!(feed.remaining(), 0);
}

#[tokio::test]
async fn test_feed_error_then_recovery() {
    let repository = Arc::new(InMemoryRoundRepository::new());
    let feed = Arc::new(ScriptedResultFeed::new());
    feed.push_error("connection reset");
    feed.push_page(newest_first(1..=5));

    let session = new_session();
    let metrics = Metrics::new().unwrap();
    let poller = RoundPoller::new(
        feed,
        repository,
        session.clone(),
        metrics.clone(),
        settings(),
        None,
    );

    assert!(poller.tick().await.is_err());
    assert_eq!(session.read().await.store().len(), 0);

    let report = assert_ok!(poller.tick().await);
    assert_eq!(report.inserted.len(), 5);
    assert!(metrics.render().contains("roundcast_feed_errors_total"));
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let repository = Arc::new(InMemoryRoundRepository::new());
    let feed = Arc::new(ScriptedResultFeed::new());
    feed.push_page(newest_first(1..=10));
    feed.push_page(newest_first(1..=12));

    let session = new_session();
    let (tx, rx) = mpsc::channel(1);
    let poller = RoundPoller::new(
        feed,
        repository.clone(),
        session.clone(),
        Metrics::new().unwrap(),
        settings(),
        Some(rx),
    );
    let task = tokio::spawn(poller.run());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_ok!(tx.send(PollerCommand::Shutdown).await);
    assert_ok!(tokio::time::timeout(Duration::from_secs(2), task).await);

    assert_eq!(session.read().await.store().len(), 12);
    assert_eq!(assert_ok!(repository.count().await), 12);
}
