//! Model-based consistency checks for a UTXO chain engine.
//!
//! A scenario names blocks of transactions by the positions of the outputs
//! they spend. The runner synthesizes and commits each block, checks the
//! engine's main-chain view and ledger after every commit, snapshots the
//! ledger at the rollback height, and finally reorganizes back to it and
//! checks that the ledger matches the snapshot exactly.

pub mod config;
pub mod document;
pub mod driver;
pub mod environment;
pub mod error;
pub mod resolver;
pub mod runner;
pub mod scenario;
pub mod snapshot;
pub mod synth;
pub mod validator;

pub use config::{Backend, RunConfig};
pub use document::{BlockSpec, InputSpec, ScenarioSpec, TransactionSpec};
pub use driver::CommitDriver;
pub use environment::{run_scenario, RunEnvironment};
pub use error::{
    BuildError, InvariantViolation, ReferenceError, RollbackViolation, RunFailure, ScenarioError,
    Step,
};
pub use resolver::InputResolver;
pub use runner::{RollbackOutcome, RunReport, ScenarioRunner};
pub use scenario::{InputRef, Scenario, ScenarioBlock, ScenarioTx};
pub use snapshot::{LedgerSnapshot, RollbackCheckpoint};
pub use synth::{synthesize_block, synthesize_transaction};
pub use validator::{validate_execution, validate_status};
