//! Reward distributor trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reward transfers
#[derive(Debug, Error)]
pub enum RewardError {
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Reward distribution not configured: {0}")]
    NotConfigured(String),
}

/// Proof that a payout went through
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Transaction signature returned by the payout backend
    pub signature: String,
    /// Recipient identity the tokens were sent to
    pub recipient: String,
    /// Amount in whole reward tokens
    pub amount: u64,
}

/// Transfer status as reported by a payout backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Success,
    Error,
}

/// Wire form of a transfer result: `{status, signature?, message?}`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub status: TransferStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TransferOutcome {
    /// Convert a backend outcome into a receipt or error for the given transfer
    pub fn into_result(self, recipient: &str, amount: u64) -> Result<TransferReceipt, RewardError> {
        match (self.status, self.signature) {
            (TransferStatus::Success, Some(signature)) if !signature.is_empty() => {
                Ok(TransferReceipt {
                    signature,
                    recipient: recipient.to_string(),
                    amount,
                })
            }
            (TransferStatus::Success, _) => Err(RewardError::TransferFailed(
                "backend reported success without a signature".to_string(),
            )),
            (TransferStatus::Error, _) => Err(RewardError::TransferFailed(
                self.message.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

/// Trait for paying out series rewards
///
/// Implementations can be:
/// - MockRewardDistributor for testing
/// - RpcRewardDistributor for a real payout service
#[async_trait]
pub trait RewardDistributor: Send + Sync {
    /// Transfer `amount` reward tokens to `recipient`.
    ///
    /// Called at most once per series end; callers do not retry.
    async fn transfer(&self, recipient: &str, amount: u64) -> Result<TransferReceipt, RewardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success_into_receipt() {
        let outcome = TransferOutcome {
            status: TransferStatus::Success,
            signature: Some("5xSig".to_string()),
            message: None,
        };

        let receipt = outcome.into_result("alice", 20).unwrap();
        assert_eq!(receipt.signature, "5xSig");
        assert_eq!(receipt.recipient, "alice");
        assert_eq!(receipt.amount, 20);
    }

    #[test]
    fn test_outcome_error_keeps_message() {
        let outcome: TransferOutcome =
            serde_json::from_str(r#"{"status":"error","message":"mint not found"}"#).unwrap();

        match outcome.into_result("alice", 20) {
            Err(RewardError::TransferFailed(msg)) => assert_eq!(msg, "mint not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_outcome_success_without_signature_is_failure() {
        let outcome = TransferOutcome {
            status: TransferStatus::Success,
            signature: Some(String::new()),
            message: None,
        };

        assert!(matches!(
            outcome.into_result("alice", 20),
            Err(RewardError::TransferFailed(_))
        ));
    }
}
