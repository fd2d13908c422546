pub mod block;
pub mod consensus;
pub mod hash;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::{Blockchain, ChainError};

/// Default Proof-of-Work difficulty (number of leading zero hex chars).
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Difficulty bounds (keep low in dev to avoid long waits; 16 is the
/// digest width and therefore the hard ceiling).
pub const DIFF_MIN: u32 = 1;
pub const DIFF_MAX: u32 = 6;

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// Previous-hash link of the genesis block (all-zero digest).
pub const GENESIS_PREV_HASH: &str = "0000000000000000";

/// Sender address reserved for mining rewards.
pub const MINING_SENDER: &str = "0";

/// Coins awarded to a node for forging a block.
pub const MINING_REWARD: u64 = 1;

/// How many proof candidates to try between cancellation-flag polls.
pub const CANCEL_POLL_INTERVAL: u64 = 10_000;
