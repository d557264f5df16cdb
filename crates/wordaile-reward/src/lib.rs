//! Wordaile Reward Library
//!
//! Payout primitives for series winners:
//! - RewardDistributor trait and its error type
//! - MockRewardDistributor for tests and local runs
//! - RpcRewardDistributor talking to a JSON-RPC payout service

pub mod distributor;

pub use distributor::{
    MockRewardDistributor, RewardDistributor, RewardError, RpcRewardDistributor, TransferOutcome,
    TransferReceipt, TransferStatus,
};
