//! Block assembly: candidate blocks on top of a chain, and solving them.

use oracle_transactions::{always_true, Transaction};
use oracle_types::{BlockHash, ChainParams, Height, Timestamp};
use oracle_work::WorkGenerator;

use crate::block::{transactions_root, Block, BlockHeader, BLOCK_VERSION};
use crate::engine::ChainEngine;
use crate::genesis::coinbase_transaction;
use crate::status::TransactionStatus;
use crate::LedgerError;

/// Builds candidate blocks and makes them committable.
pub trait BlockAssembler {
    /// A block holding only the coinbase, at the given position.
    fn empty_block(
        &self,
        height: Height,
        timestamp: Timestamp,
        parent: BlockHash,
        bits: u64,
    ) -> Block;

    /// A block on top of `chain`'s tip holding a coinbase paying
    /// `reward_program`, followed by `transactions` in order.
    fn new_block<C: ChainEngine + ?Sized>(
        &self,
        chain: &C,
        transactions: Vec<Transaction>,
        reward_program: &[u8],
    ) -> Result<Block, LedgerError>;

    /// Find a nonce that satisfies the block's difficulty.
    fn solve(&self, block: &mut Block) -> Result<(), LedgerError>;
}

/// The reference assembler.
#[derive(Clone, Debug, Default)]
pub struct Assembler {
    params: ChainParams,
    work: WorkGenerator,
}

impl Assembler {
    pub fn new(params: ChainParams) -> Self {
        Self {
            params,
            work: WorkGenerator::default(),
        }
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    fn assemble(
        &self,
        height: Height,
        timestamp: Timestamp,
        parent: BlockHash,
        bits: u64,
        transactions: Vec<Transaction>,
    ) -> Block {
        let header = BlockHeader {
            version: BLOCK_VERSION,
            height,
            previous: parent,
            timestamp,
            bits,
            nonce: 0,
            transactions_root: transactions_root(&transactions),
            transaction_status_hash: TransactionStatus::all_success(transactions.len()).root(),
        };
        Block {
            header,
            transactions,
        }
    }
}

impl BlockAssembler for Assembler {
    fn empty_block(
        &self,
        height: Height,
        timestamp: Timestamp,
        parent: BlockHash,
        bits: u64,
    ) -> Block {
        let coinbase = coinbase_transaction(&self.params, height, &always_true());
        self.assemble(height, timestamp, parent, bits, vec![coinbase])
    }

    fn new_block<C: ChainEngine + ?Sized>(
        &self,
        chain: &C,
        transactions: Vec<Transaction>,
        reward_program: &[u8],
    ) -> Result<Block, LedgerError> {
        if transactions.iter().any(|tx| tx.is_coinbase()) {
            return Err(LedgerError::invalid(
                "user transactions may not contain a coinbase",
            ));
        }
        let parent = chain.best_block();
        let height = parent.height() + 1;

        let mut all = Vec::with_capacity(transactions.len() + 1);
        all.push(coinbase_transaction(&self.params, height, reward_program));
        all.extend(transactions);

        Ok(self.assemble(
            height,
            parent.timestamp().plus_secs(self.params.block_interval_secs),
            parent.hash(),
            parent.bits(),
            all,
        ))
    }

    fn solve(&self, block: &mut Block) -> Result<(), LedgerError> {
        let nonce = self.work.generate(&block.hash(), block.bits())?;
        block.header.nonce = nonce.0;
        Ok(())
    }
}
