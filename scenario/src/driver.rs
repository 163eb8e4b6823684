//! Commits blocks to the engine and extends the chain with empty blocks.

use oracle_ledger::{Block, BlockAssembler, ChainEngine};

use crate::ScenarioError;

#[derive(Clone, Copy, Debug)]
pub struct CommitDriver {
    block_interval_secs: u64,
}

impl CommitDriver {
    pub fn new(block_interval_secs: u64) -> Self {
        Self {
            block_interval_secs,
        }
    }

    /// Solve `block` and hand it to the engine. Returns the solved block.
    pub fn commit<C, A>(
        &self,
        chain: &mut C,
        assembler: &A,
        mut block: Block,
    ) -> Result<Block, ScenarioError>
    where
        C: ChainEngine + ?Sized,
        A: BlockAssembler + ?Sized,
    {
        assembler.solve(&mut block).map_err(ScenarioError::Commit)?;
        chain
            .process_block(block.clone())
            .map_err(ScenarioError::Commit)?;
        Ok(block)
    }

    /// Commit `count` coinbase-only blocks, each on top of the one before.
    pub fn extend<C, A>(&self, chain: &mut C, assembler: &A, count: u64) -> Result<(), ScenarioError>
    where
        C: ChainEngine + ?Sized,
        A: BlockAssembler + ?Sized,
    {
        for _ in 0..count {
            let parent = chain.best_block();
            let block = assembler.empty_block(
                parent.height() + 1,
                parent.timestamp().plus_secs(self.block_interval_secs),
                parent.hash(),
                parent.bits(),
            );
            let block = self.commit(&mut *chain, assembler, block)?;
            tracing::debug!(height = block.height(), hash = %block.hash(), "extension block committed");
        }
        Ok(())
    }
}
