//! Chain parameters for the reference engine.

use serde::{Deserialize, Serialize};

use crate::Amount;

/// Parameters fixed at genesis.
///
/// Every field has a serde default so a run configuration only needs to name
/// the values it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    /// Genesis block timestamp (Unix seconds).
    #[serde(default = "default_genesis_timestamp")]
    pub genesis_timestamp: u64,

    /// Minimum work value a block must reach. Higher is harder.
    #[serde(default = "default_genesis_bits")]
    pub genesis_bits: u64,

    /// Seconds between a block and its child.
    #[serde(default = "default_block_interval_secs")]
    pub block_interval_secs: u64,

    /// Amount paid by every coinbase transaction.
    #[serde(default = "default_coinbase_reward")]
    pub coinbase_reward: Amount,
}

fn default_genesis_timestamp() -> u64 {
    1_524_549_600
}

fn default_genesis_bits() -> u64 {
    // roughly one in sixteen nonces succeeds
    0xF000_0000_0000_0000
}

fn default_block_interval_secs() -> u64 {
    150
}

fn default_coinbase_reward() -> Amount {
    Amount::new(41_250_000_000)
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            genesis_timestamp: default_genesis_timestamp(),
            genesis_bits: default_genesis_bits(),
            block_interval_secs: default_block_interval_secs(),
            coinbase_reward: default_coinbase_reward(),
        }
    }
}

impl ChainParams {
    /// Parameters with trivial work, for fast tests.
    pub fn dev() -> Self {
        Self {
            genesis_bits: 0,
            ..Self::default()
        }
    }
}
