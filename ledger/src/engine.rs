//! Chain engine interface.
//!
//! The scenario harness drives and inspects a chain exclusively through this
//! trait, so any engine that exposes these queries can be checked by it.

use oracle_types::{BlockHash, Height};

use crate::{Block, LedgerError, TransactionStatus};

pub trait ChainEngine {
    /// Tip of the main chain.
    fn best_block(&self) -> &Block;

    /// Height of the main-chain tip.
    fn height(&self) -> Height {
        self.best_block().height()
    }

    /// Main-chain block at `height`.
    fn block_by_height(&self, height: Height) -> Result<&Block, LedgerError>;

    /// Whether the block `hash` sits on the main chain at `height`.
    fn in_main_chain(&self, height: Height, hash: &BlockHash) -> bool;

    /// Recorded per-transaction verification outcomes of block `hash`.
    fn transaction_status(&self, hash: &BlockHash) -> Result<&TransactionStatus, LedgerError>;

    /// Validate `block` and apply it: extend the main chain, store it on a
    /// side branch, or reorganize onto it when its branch becomes the longest.
    fn process_block(&mut self, block: Block) -> Result<(), LedgerError>;

    /// Make `block` the main-chain tip, detaching and attaching as needed.
    fn reorganize_to(&mut self, block: &Block) -> Result<(), LedgerError>;
}
