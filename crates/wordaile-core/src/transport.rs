//! Host -> participant round-trip.

use crate::crypto::SignedEnvelope;
use crate::protocol::{BoardBroadcast, GuessReply, Participant};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failures talking to a single participant.
///
/// Always isolated to that participant: the guess cycle logs them and moves on.
#[derive(Debug, Error)]
pub enum ParticipantError {
    #[error("Participant has no endpoint")]
    NoEndpoint,

    #[error("Participant unreachable: {0}")]
    Unreachable(String),

    #[error("Participant did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Participant answered with HTTP {0}")]
    Status(u16),

    #[error("Malformed reply: {0}")]
    Malformed(String),
}

/// Pushes a signed board broadcast and waits for the participant's guess
#[async_trait]
pub trait ParticipantClient: Send + Sync {
    /// Returns the raw guess string; validation is the caller's job
    async fn request_guess(
        &self,
        participant: &Participant,
        envelope: &SignedEnvelope<BoardBroadcast>,
    ) -> Result<String, ParticipantError>;
}

/// POSTs the envelope as JSON to the participant's endpoint
#[derive(Clone)]
pub struct HttpParticipantClient {
    client: Client,
    timeout: Duration,
}

impl HttpParticipantClient {
    pub fn new(timeout: Duration) -> Result<Self, ParticipantError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ParticipantError::Unreachable(e.to_string()))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl ParticipantClient for HttpParticipantClient {
    async fn request_guess(
        &self,
        participant: &Participant,
        envelope: &SignedEnvelope<BoardBroadcast>,
    ) -> Result<String, ParticipantError> {
        let endpoint = participant
            .endpoint
            .as_deref()
            .ok_or(ParticipantError::NoEndpoint)?;

        let response = self
            .client
            .post(endpoint)
            .json(envelope)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ParticipantError::Timeout(self.timeout)
                } else {
                    ParticipantError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParticipantError::Status(status.as_u16()));
        }

        let reply: GuessReply = response
            .json()
            .await
            .map_err(|e| ParticipantError::Malformed(e.to_string()))?;

        Ok(reply.guess)
    }
}
