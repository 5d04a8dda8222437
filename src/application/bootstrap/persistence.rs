use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageEnvConfig};
use crate::domain::repositories::RoundRepository;
use crate::infrastructure::persistence::database::Database;
use crate::infrastructure::persistence::repositories::SqliteRoundRepository;
use crate::infrastructure::repositories::InMemoryRoundRepository;

pub struct PersistenceHandle {
    /// Present only with the SQLite backend
    pub db: Option<Database>,
    pub round_repository: Arc<dyn RoundRepository>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(storage: &StorageEnvConfig) -> Result<PersistenceHandle> {
        match storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory round storage");
                Ok(PersistenceHandle {
                    db: None,
                    round_repository: Arc::new(InMemoryRoundRepository::new()),
                })
            }
            StorageBackend::Sqlite => {
                info!("Initializing Database at {}", storage.database_url);
                let db = Database::new(&storage.database_url)
                    .await
                    .context("Failed to initialize database")?;
                let round_repository = Arc::new(SqliteRoundRepository::new(db.pool.clone()));
                Ok(PersistenceHandle {
                    db: Some(db),
                    round_repository,
                })
            }
        }
    }
}
