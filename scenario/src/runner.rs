//! The run loop: build, commit, validate, checkpoint, extend; then roll back.

use oracle_ledger::{BlockAssembler, ChainEngine};
use oracle_store::KvStore;
use oracle_types::{BlockHash, Height};

use crate::driver::CommitDriver;
use crate::scenario::Scenario;
use crate::snapshot::{LedgerSnapshot, RollbackCheckpoint};
use crate::synth::synthesize_block;
use crate::validator::{validate_execution, validate_status};
use crate::{RollbackViolation, RunFailure, Step};

/// What happened at the end of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// The chain was reorganized to the checkpoint and the ledger matched.
    Verified {
        height: Height,
        hash: BlockHash,
        entries: usize,
    },
    /// The scenario names no rollback target.
    NotRequested,
    /// No scenario block covered the rollback target.
    TargetNotReached { target: Height },
}

impl RollbackOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub blocks_committed: usize,
    pub extension_blocks: u64,
    /// Tip height once every block was committed, before any rollback.
    pub peak_height: Height,
    /// Tip height when the run ended.
    pub final_height: Height,
    pub rollback: RollbackOutcome,
}

pub struct ScenarioRunner<'a, C: ?Sized, S: ?Sized, A: ?Sized> {
    chain: &'a mut C,
    store: &'a S,
    assembler: &'a A,
    driver: CommitDriver,
    require_rollback: bool,
}

impl<'a, C, S, A> ScenarioRunner<'a, C, S, A>
where
    C: ChainEngine + ?Sized,
    S: KvStore + ?Sized,
    A: BlockAssembler + ?Sized,
{
    /// `store` must be the store `chain` keeps its ledger in.
    pub fn new(chain: &'a mut C, store: &'a S, assembler: &'a A, driver: CommitDriver) -> Self {
        Self {
            chain,
            store,
            assembler,
            driver,
            require_rollback: false,
        }
    }

    pub fn require_rollback(mut self, require: bool) -> Self {
        self.require_rollback = require;
        self
    }

    pub fn run(&mut self, scenario: &Scenario) -> Result<RunReport, RunFailure> {
        let mut checkpoint: Option<RollbackCheckpoint> = None;
        let mut extension_blocks = 0;

        for (index, spec) in scenario.blocks.iter().enumerate() {
            let block = synthesize_block(spec, &*self.chain, self.assembler)
                .map_err(|e| RunFailure::at(index, Step::Build, e))?;
            let block = self
                .driver
                .commit(&mut *self.chain, self.assembler, block)
                .map_err(|e| RunFailure::at(index, Step::Commit, e))?;

            validate_status(&*self.chain, &block)
                .and_then(|()| validate_execution(self.store, &block))
                .map_err(|e| RunFailure::at(index, Step::Validate, e))?;
            tracing::info!(
                index,
                height = block.height(),
                hash = %block.hash(),
                transactions = block.transactions.len(),
                "block committed and validated"
            );

            let covers_target = scenario
                .rollback_target
                .is_some_and(|target| spec.covers(target));
            if checkpoint.is_none() && covers_target {
                let snapshot = LedgerSnapshot::capture(self.store)
                    .map_err(|e| RunFailure::at(index, Step::Checkpoint, e))?;
                tracing::debug!(
                    height = block.height(),
                    entries = snapshot.len(),
                    "captured rollback checkpoint"
                );
                checkpoint = Some(RollbackCheckpoint { block, snapshot });
            }

            self.driver
                .extend(&mut *self.chain, self.assembler, spec.extension_count)
                .map_err(|e| RunFailure::at(index, Step::Extend, e))?;
            extension_blocks += spec.extension_count;
        }

        let peak_height = self.chain.height();
        let rollback = match (checkpoint, scenario.rollback_target) {
            (Some(checkpoint), _) => {
                checkpoint
                    .verify(&mut *self.chain, self.store)
                    .map_err(|e| RunFailure::global(Step::Rollback, e))?;
                tracing::info!(
                    from = peak_height,
                    to = checkpoint.block.height(),
                    entries = checkpoint.snapshot.len(),
                    "rollback verified"
                );
                RollbackOutcome::Verified {
                    height: checkpoint.block.height(),
                    hash: checkpoint.block.hash(),
                    entries: checkpoint.snapshot.len(),
                }
            }
            (None, Some(target)) => {
                tracing::warn!(rollback_to = target, peak_height, "no block covered the rollback target");
                if self.require_rollback {
                    return Err(RunFailure::global(
                        Step::Rollback,
                        RollbackViolation::NoCheckpoint { target },
                    ));
                }
                RollbackOutcome::TargetNotReached { target }
            }
            (None, None) => {
                if self.require_rollback {
                    return Err(RunFailure::global(
                        Step::Rollback,
                        RollbackViolation::NoTarget,
                    ));
                }
                RollbackOutcome::NotRequested
            }
        };

        Ok(RunReport {
            blocks_committed: scenario.blocks.len(),
            extension_blocks,
            peak_height,
            final_height: self.chain.height(),
            rollback,
        })
    }
}
