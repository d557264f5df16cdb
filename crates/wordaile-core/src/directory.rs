//! Participant directory: who is subscribed and where to reach them.

use crate::protocol::Participant;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Errors from directory lookups
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed roster: {0}")]
    Decode(String),
}

/// Supplies the live roster each guess cycle
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    /// Current subscribers, whatever their status
    async fn list_active(&self) -> Result<Vec<Participant>, DirectoryError>;
}

/// Roster held in memory; can be replaced while the game runs
#[derive(Clone, Default)]
pub struct StaticDirectory {
    roster: Arc<RwLock<Vec<Participant>>>,
}

impl StaticDirectory {
    pub fn new(roster: Vec<Participant>) -> Self {
        Self {
            roster: Arc::new(RwLock::new(roster)),
        }
    }

    /// Parse `id=endpoint` pairs separated by commas
    pub fn from_spec(spec: &str) -> Result<Self, DirectoryError> {
        let roster = spec
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .split_once('=')
                    .map(|(id, endpoint)| Participant::active(id.trim(), endpoint.trim()))
                    .ok_or_else(|| {
                        DirectoryError::Decode(format!("expected id=endpoint, got {:?}", entry))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(roster))
    }

    /// Replace the whole roster
    pub fn set_roster(&self, roster: Vec<Participant>) {
        *self.roster.write().unwrap() = roster;
    }
}

#[async_trait]
impl ParticipantDirectory for StaticDirectory {
    async fn list_active(&self) -> Result<Vec<Participant>, DirectoryError> {
        Ok(self.roster.read().unwrap().clone())
    }
}

/// Fetches the roster as a JSON array from a directory service
pub struct HttpDirectory {
    client: Client,
    url: String,
}

impl HttpDirectory {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ParticipantDirectory for HttpDirectory {
    async fn list_active(&self) -> Result<Vec<Participant>, DirectoryError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        response
            .json::<Vec<Participant>>()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}
