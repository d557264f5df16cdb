//! Reward distributor abstraction.

mod mock;
mod rpc;
mod traits;

pub use mock::MockRewardDistributor;
pub use rpc::RpcRewardDistributor;
pub use traits::{RewardDistributor, RewardError, TransferOutcome, TransferReceipt, TransferStatus};
