//! Reward payout abstraction.
//!
//! Re-exports from wordaile-reward so callers only need this crate.

pub use wordaile_reward::{
    MockRewardDistributor, RewardDistributor, RewardError, RpcRewardDistributor, TransferOutcome,
    TransferReceipt, TransferStatus,
};
