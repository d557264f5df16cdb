//! Winner history ledger.

use crate::protocol::{WinnerHistory, WinnerRecord};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tracing::warn;

/// Errors from the ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only record of series winners
#[async_trait]
pub trait WinnerLedger: Send + Sync {
    async fn append(&self, record: WinnerRecord) -> Result<(), LedgerError>;

    /// All records, oldest first
    async fn read_all(&self) -> Result<Vec<WinnerRecord>, LedgerError>;
}

/// In-memory ledger for tests and throwaway runs
#[derive(Clone, Default)]
pub struct MemoryLedger {
    records: Arc<Mutex<Vec<WinnerRecord>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WinnerLedger for MemoryLedger {
    async fn append(&self, record: WinnerRecord) -> Result<(), LedgerError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<WinnerRecord>, LedgerError> {
        Ok(self.records.lock().unwrap().clone())
    }
}

/// Ledger persisted as `{ "winners": [...] }` in a JSON file
pub struct JsonFileLedger {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: AsyncMutex<()>,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: AsyncMutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored history. Only a missing file counts as empty.
    async fn load(&self) -> Result<WinnerHistory, LedgerError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(WinnerHistory::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        name.into()
    }
}

#[async_trait]
impl WinnerLedger for JsonFileLedger {
    async fn append(&self, record: WinnerRecord) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;

        let mut history = self.load().await?;
        history.winners.push(record);

        // Write aside, then rename over the old file
        let json = serde_json::to_vec_pretty(&history)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    /// A missing or unparsable file reads as empty history
    async fn read_all(&self) -> Result<Vec<WinnerRecord>, LedgerError> {
        match self.load().await {
            Ok(history) => Ok(history.winners),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "winner history unreadable, reporting empty");
                Ok(Vec::new())
            }
        }
    }
}
