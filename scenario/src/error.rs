use std::fmt;

use oracle_ledger::LedgerError;
use oracle_store::StoreError;
use oracle_transactions::TransactionError;
use oracle_types::{BlockHash, Height, OutputId, TxHash, UtxoEntry};
use thiserror::Error;

/// A scenario input that does not name an existing output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("no main-chain block at height {height}")]
    HeightNotFound { height: Height },

    #[error("block at height {height} has {count} transactions, no index {tx_index}")]
    TxIndexOutOfRange {
        height: Height,
        tx_index: usize,
        count: usize,
    },

    #[error("intra-block reference to the coinbase of the block being built")]
    InFlightCoinbase,

    #[error("intra-block reference to transaction {tx_index}, only {built} built before it")]
    IntraBlockIndexOutOfRange { tx_index: usize, built: usize },

    #[error("transaction has {count} outputs, no index {output_index}")]
    OutputIndexOutOfRange { output_index: usize, count: usize },

    #[error("height {height} is above the block being built at {build_height}")]
    FutureHeight { height: Height, build_height: Height },
}

/// Synthesis of a transaction or block failed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("transaction rejected by builder: {0}")]
    Transaction(#[from] TransactionError),

    #[error("block assembly failed: {0}")]
    Block(#[from] LedgerError),

    #[error("assembled block at height {actual}, expected {expected}")]
    HeightDrift { expected: Height, actual: Height },
}

/// A post-commit check on the engine or its ledger failed.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    #[error("block {hash} at height {height} is not on the main chain")]
    NotInMainChain { height: Height, hash: BlockHash },

    #[error("best block is {actual}, expected {expected}")]
    BestBlockMismatch { expected: BlockHash, actual: BlockHash },

    #[error("main-chain block at height {height} is {actual}, expected {expected}")]
    HeightLookupMismatch {
        height: Height,
        expected: BlockHash,
        actual: BlockHash,
    },

    #[error("engine query failed: {0}")]
    Engine(#[source] LedgerError),

    #[error("transaction status root {actual} does not match header commitment {expected}")]
    StatusRootMismatch { expected: String, actual: String },

    #[error("spent output {output_id} of tx {tx_hash} left a non-coinbase entry")]
    SpentEntryNotCoinbase { tx_hash: TxHash, output_id: OutputId },

    #[error("spent coinbase output {output_id} of tx {tx_hash} is not marked spent")]
    SpentEntryNotMarked { tx_hash: TxHash, output_id: OutputId },

    #[error("output {output_id} of tx {tx_hash} has no ledger entry")]
    OutputMissing { tx_hash: TxHash, output_id: OutputId },

    #[error("output {output_id} recorded at height {actual}, expected {expected}")]
    OutputHeightMismatch {
        output_id: OutputId,
        expected: Height,
        actual: Height,
    },

    #[error("output {output_id} created at height {height} is already marked spent")]
    OutputSpent { output_id: OutputId, height: Height },

    #[error("ledger read failed: {0}")]
    Storage(#[from] StoreError),
}

/// The ledger after a reorganization differs from the checkpoint snapshot.
#[derive(Debug, Error)]
pub enum RollbackViolation {
    #[error("ledger holds {after} entries after rollback, {before} at the checkpoint")]
    SizeMismatch { before: usize, after: usize },

    #[error("entry {key} missing after rollback, was {before:?}")]
    EntryMissing { key: String, before: UtxoEntry },

    #[error("entry {key} changed across rollback: {before:?} became {after:?}")]
    EntryChanged {
        key: String,
        before: UtxoEntry,
        after: UtxoEntry,
    },

    #[error("checkpoint block fails status checks after rollback: {0}")]
    Status(#[source] InvariantViolation),

    #[error("rollback target {target} is not covered by any scenario block")]
    NoCheckpoint { target: Height },

    #[error("scenario has no rollback target")]
    NoTarget,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("transaction {tx}, input {input}: {source}")]
    Reference {
        tx: usize,
        input: usize,
        #[source]
        source: ReferenceError,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("engine rejected block: {0}")]
    Commit(#[source] LedgerError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Rollback(#[from] RollbackViolation),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("scenario heights overflow after {blocks} blocks")]
    HeightOverflow { blocks: usize },

    #[error("invalid scenario document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("invalid run configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid chain parameter {field}: {reason}")]
    InvalidParams {
        field: &'static str,
        reason: &'static str,
    },

    #[error("run environment: {0}")]
    Environment(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Phase of a run in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Setup,
    Load,
    Build,
    Commit,
    Validate,
    Checkpoint,
    Extend,
    Rollback,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Setup => "setup",
            Step::Load => "load",
            Step::Build => "build",
            Step::Commit => "commit",
            Step::Validate => "validate",
            Step::Checkpoint => "checkpoint",
            Step::Extend => "extend",
            Step::Rollback => "rollback",
        };
        f.write_str(name)
    }
}

/// A failed run: which scenario block, which step, and why.
#[derive(Debug)]
pub struct RunFailure {
    /// Index into the scenario's block list, `None` outside the block loop.
    pub block: Option<usize>,
    pub step: Step,
    pub error: ScenarioError,
}

impl RunFailure {
    pub fn at(block: usize, step: Step, error: impl Into<ScenarioError>) -> Self {
        Self {
            block: Some(block),
            step,
            error: error.into(),
        }
    }

    pub fn global(step: Step, error: impl Into<ScenarioError>) -> Self {
        Self {
            block: None,
            step,
            error: error.into(),
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block {
            Some(index) => write!(f, "block {index}: {} failed: {}", self.step, self.error),
            None => write!(f, "{} failed: {}", self.step, self.error),
        }
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
