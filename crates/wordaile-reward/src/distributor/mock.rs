//! Mock reward distributor for testing.

use super::traits::{RewardDistributor, RewardError, TransferReceipt};
use async_trait::async_trait;
use rand::RngCore;
use std::sync::{Arc, Mutex};

/// In-memory mock distributor for testing
#[derive(Clone)]
pub struct MockRewardDistributor {
    /// Simulated treasury balance
    balance: Arc<Mutex<u64>>,
    /// Every successful transfer, in order
    transfers: Arc<Mutex<Vec<TransferReceipt>>>,
    /// Number of transfer attempts, successful or not
    attempts: Arc<Mutex<usize>>,
    /// When set, every transfer fails with this message
    failure: Arc<Mutex<Option<String>>>,
}

impl MockRewardDistributor {
    /// Create a new mock distributor with initial balance
    pub fn new(initial_balance: u64) -> Self {
        Self {
            balance: Arc::new(Mutex::new(initial_balance)),
            transfers: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(0)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Get current balance
    pub fn balance(&self) -> u64 {
        *self.balance.lock().unwrap()
    }

    /// Make every following transfer fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Let transfers succeed again
    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Get all successful transfers (for testing)
    pub fn transfers(&self) -> Vec<TransferReceipt> {
        self.transfers.lock().unwrap().clone()
    }

    /// Number of times `transfer` was called
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl RewardDistributor for MockRewardDistributor {
    async fn transfer(&self, recipient: &str, amount: u64) -> Result<TransferReceipt, RewardError> {
        *self.attempts.lock().unwrap() += 1;

        if recipient.is_empty() {
            return Err(RewardError::InvalidRecipient(recipient.to_string()));
        }

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(RewardError::TransferFailed(message));
        }

        {
            let mut balance = self.balance.lock().unwrap();
            if *balance < amount {
                return Err(RewardError::InsufficientFunds {
                    needed: amount,
                    available: *balance,
                });
            }
            *balance -= amount;
        }

        let mut tx = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut tx);

        let receipt = TransferReceipt {
            signature: format!("mock_transfer_{}", hex::encode(tx)),
            recipient: recipient.to_string(),
            amount,
        };

        self.transfers.lock().unwrap().push(receipt.clone());
        Ok(receipt)
    }
}
