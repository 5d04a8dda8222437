//! Storage configuration parsing from environment variables.

use crate::config::parse_env;
use anyhow::Result;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Where observed rounds are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            _ => anyhow::bail!("Invalid STORAGE_BACKEND: {}. Must be 'memory' or 'sqlite'", s),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Storage environment configuration
#[derive(Debug, Clone)]
pub struct StorageEnvConfig {
    pub backend: StorageBackend,
    pub database_url: String,
}

impl StorageEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend: parse_env("STORAGE_BACKEND", StorageBackend::Memory)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://roundcast.db".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("SQLite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
