use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::models::portfolio::Portfolio;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Portfolio data not found: {0}")]
    NotFound(String),

    #[error("Failed to save portfolio data: {0}")]
    SaveFailed(String),
}

/// Owned cell holding the portfolio document, backed by a JSON file.
///
/// The file is read once, on the first successful `get`. After that the cache
/// is authoritative: edits made to the file behind the server's back are not
/// seen until restart. Concurrent `replace` calls are last-writer-wins.
pub struct PortfolioStore {
    path: PathBuf,
    cache: RwLock<Option<Portfolio>>,
}

impl PortfolioStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached document, loading it from disk on first use.
    /// A failed load leaves the cache empty so the next call retries.
    pub async fn get(&self) -> Result<Portfolio, StoreError> {
        if let Some(portfolio) = self.cache.read().await.as_ref() {
            return Ok(portfolio.clone());
        }

        let mut cache = self.cache.write().await;
        // Another task may have loaded it while we waited for the write lock.
        if let Some(portfolio) = cache.as_ref() {
            return Ok(portfolio.clone());
        }

        let portfolio = load(&self.path).await.map_err(|e| {
            error!("Error loading portfolio data from {}: {e}", self.path.display());
            e
        })?;
        info!("Loaded portfolio data from {}", self.path.display());
        *cache = Some(portfolio.clone());
        Ok(portfolio)
    }

    /// Replaces the whole document in memory, then persists it.
    ///
    /// The in-memory swap happens first and is not rolled back if the write
    /// fails; the caller sees `SaveFailed` while readers already see the new
    /// document.
    pub async fn replace(&self, portfolio: Portfolio) -> Result<Portfolio, StoreError> {
        *self.cache.write().await = Some(portfolio.clone());

        let json = serde_json::to_string_pretty(&portfolio)
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            error!("Error saving portfolio data to {}: {e}", self.path.display());
            StoreError::SaveFailed(e.to_string())
        })?;

        info!("Saved portfolio data to {}", self.path.display());
        Ok(portfolio)
    }
}

async fn load(path: &Path) -> Result<Portfolio, StoreError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::NotFound(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| StoreError::NotFound(format!("{} is not a valid portfolio: {e}", path.display())))
}
