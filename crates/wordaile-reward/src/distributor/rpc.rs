//! RPC client for a reward payout service.
//!
//! This module provides a real implementation of `RewardDistributor` that asks
//! a payout node to send reward tokens via JSON-RPC.

use crate::distributor::traits::{RewardDistributor, RewardError, TransferOutcome, TransferReceipt};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

/// RPC distributor for reward tokens
pub struct RpcRewardDistributor {
    /// HTTP client
    client: Client,
    /// Payout node RPC URL
    rpc_url: String,
    /// Reward token (mint / contract address)
    token: Option<String>,
}

impl RpcRewardDistributor {
    /// Create a new RPC distributor without a configured token
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.into(),
            token: None,
        }
    }

    /// Create a new RPC distributor paying out the given token
    pub fn with_token(rpc_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.into(),
            token: Some(token.into()),
        }
    }

    /// Make a JSON-RPC call
    async fn call(&self, method: &str, params: Value) -> Result<Value, RewardError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": [params]
        });

        debug!(method = %method, request = %request, "reward rpc call");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RewardError::NetworkError(e.to_string()))?;

        let result: Value = response
            .json()
            .await
            .map_err(|e| RewardError::NetworkError(e.to_string()))?;

        debug!(method = %method, response = %result, "reward rpc reply");

        if let Some(error) = result.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(RewardError::TransferFailed(msg.to_string()));
        }

        result
            .get("result")
            .cloned()
            .ok_or_else(|| RewardError::NetworkError("No result in response".to_string()))
    }
}

#[async_trait]
impl RewardDistributor for RpcRewardDistributor {
    async fn transfer(&self, recipient: &str, amount: u64) -> Result<TransferReceipt, RewardError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| RewardError::NotConfigured("reward token not set".to_string()))?;

        if recipient.is_empty() {
            return Err(RewardError::InvalidRecipient(recipient.to_string()));
        }

        let params = json!({
            "token": token,
            "recipient": recipient,
            "amount": format!("0x{:x}", amount),
        });

        let result = self.call("transfer_reward", params).await?;

        let outcome: TransferOutcome = serde_json::from_value(result)
            .map_err(|e| RewardError::NetworkError(format!("Malformed transfer result: {}", e)))?;

        outcome.into_result(recipient, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transfer_without_token_is_not_configured() {
        let distributor = RpcRewardDistributor::new("http://127.0.0.1:1");

        let result = distributor.transfer("alice", 20).await;
        assert!(matches!(result, Err(RewardError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        // Port 1 is never listening locally
        let distributor = RpcRewardDistributor::with_token("http://127.0.0.1:1", "REWARD");

        let result = distributor.transfer("alice", 20).await;
        assert!(matches!(result, Err(RewardError::NetworkError(_))));
    }
}
