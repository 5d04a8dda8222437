use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::bootstrap::{
    persistence::{PersistenceBootstrap, PersistenceHandle},
    services::{ServicesBootstrap, ServicesHandle},
};
use crate::application::poller::{PollerCommand, PollerSettings, RoundPoller};
use crate::application::session::PredictionSession;
use crate::config::Config;
use crate::domain::config::EngineConfig;
use crate::infrastructure::observability::{Metrics, StatusReporter};

pub struct SystemHandle {
    pub poller_cmd_tx: mpsc::Sender<PollerCommand>,
    pub session: Arc<RwLock<PredictionSession>>,
    pub metrics: Metrics,
    poller_task: JoinHandle<()>,
    reporter_task: Option<JoinHandle<()>>,
}

impl SystemHandle {
    /// Stops the poller after its current tick and the status reporter.
    pub async fn shutdown(self) -> Result<()> {
        info!("Initiating Graceful Shutdown Sequence...");
        if self.poller_cmd_tx.send(PollerCommand::Shutdown).await.is_err() {
            warn!("RoundPoller already stopped");
        }
        self.poller_task
            .await
            .context("RoundPoller task panicked")?;
        if let Some(reporter) = self.reporter_task {
            reporter.abort();
        }

        let status = self.session.read().await.snapshot();
        info!("Final status: {}", status.headline());
        Ok(())
    }
}

pub struct Application {
    pub config: Config,
    pub engine_config: EngineConfig,
    pub persistence: PersistenceHandle,
    pub services: ServicesHandle,
    pub session: Arc<RwLock<PredictionSession>>,
    pub metrics: Metrics,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self> {
        info!("Building roundcast Application (Mode: {})...", config.mode);

        let engine_config = config.to_engine_config()?;
        info!(
            "Engine profile {}: sureshot>{} high>{} low>{} (enabled: {}) recovery>{} after {} losses",
            config.engine.profile,
            engine_config.sureshot_min,
            engine_config.high_min,
            engine_config.low_min,
            engine_config.low_tier_enabled,
            engine_config.recovery_min,
            engine_config.recovery_loss_streak
        );

        let metrics = Metrics::new()?;
        let persistence = PersistenceBootstrap::init(&config.storage).await?;
        let services = ServicesBootstrap::init(&config)?;

        let session = Arc::new(RwLock::new(PredictionSession::new(
            engine_config.clone(),
            config.engine.history_cap,
            config.engine.outcome_log_limit,
        )));

        Ok(Self {
            config,
            engine_config,
            persistence,
            services,
            session,
            metrics,
        })
    }

    fn poller_settings(&self) -> PollerSettings {
        PollerSettings {
            page_size: self.config.feed.page_size,
            backfill_pages: self.config.feed.backfill_pages,
            poll_interval: self.config.feed.poll_interval(),
            error_backoff: self.config.feed.error_backoff(),
            restore_limit: self.config.engine.history_cap,
        }
    }

    pub async fn start(self) -> Result<SystemHandle> {
        info!("Starting RoundPoller...");

        let (poller_cmd_tx, poller_cmd_rx) = mpsc::channel(4);
        let poller = RoundPoller::new(
            self.services.feed.clone(),
            self.persistence.round_repository.clone(),
            self.session.clone(),
            self.metrics.clone(),
            self.poller_settings(),
            Some(poller_cmd_rx),
        );
        let poller_task = tokio::spawn(poller.run());

        let reporter_task = if self.config.observability.enabled {
            let reporter = StatusReporter::new(
                self.session.clone(),
                self.metrics.clone(),
                self.config.observability.interval_secs,
            );
            Some(tokio::spawn(reporter.run()))
        } else {
            info!("Status reporter disabled");
            None
        };

        Ok(SystemHandle {
            poller_cmd_tx,
            session: self.session,
            metrics: self.metrics,
            poller_task,
            reporter_task,
        })
    }
}
