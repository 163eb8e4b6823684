//! Fundamental types for the reorg oracle.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! block, transaction and output identifiers, amounts, timestamps, chain parameters,
//! ledger entries and per-transaction verification outcomes.

pub mod amount;
pub mod block;
pub mod hash;
pub mod params;
pub mod status;
pub mod time;
pub mod utxo;

pub use amount::{Amount, AssetId};
pub use block::BlockHash;
pub use hash::{OutputId, TxHash};
pub use params::ChainParams;
pub use status::VerifyStatus;
pub use time::Timestamp;
pub use utxo::UtxoEntry;

/// Position of a block in the chain. Genesis is height 0.
pub type Height = u64;
