//! Reference UTXO chain engine.
//!
//! A single-branch-at-a-time chain with proof-of-work headers, a ledger of
//! unspent outputs kept in a [`oracle_store::KvStore`], and undo logs that let
//! the main chain be rewound to any earlier block. Blocks on side branches are
//! kept and connected when the engine reorganizes onto them.

pub mod assembler;
pub mod block;
pub mod chain;
pub mod engine;
pub mod error;
pub mod genesis;
pub mod status;
pub mod utxo_view;

pub use assembler::{Assembler, BlockAssembler};
pub use block::{Block, BlockHeader, BLOCK_VERSION};
pub use chain::Chain;
pub use engine::ChainEngine;
pub use error::LedgerError;
pub use genesis::create_genesis_block;
pub use status::{status_root, TransactionStatus};
pub use utxo_view::{UndoLog, UtxoView};
