//! Shared state for the spectator API.

use std::sync::Arc;
use tokio::sync::watch;
use wordaile_core::{SeriesSnapshot, WinnerLedger};

/// Read-only handles into the running game
#[derive(Clone)]
pub struct AppState {
    /// Latest snapshot published by the series controller
    pub snapshots: watch::Receiver<SeriesSnapshot>,
    pub ledger: Arc<dyn WinnerLedger>,
    /// Hex public key participants verify broadcasts against
    pub host_public_key: String,
}

impl AppState {
    pub fn new(
        snapshots: watch::Receiver<SeriesSnapshot>,
        ledger: Arc<dyn WinnerLedger>,
        host_public_key: String,
    ) -> Self {
        Self {
            snapshots,
            ledger,
            host_public_key,
        }
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        self.snapshots.borrow().clone()
    }
}
