//! Per-run engine instances over a fresh store.

use std::sync::Arc;
use std::time::Instant;

use oracle_ledger::{Assembler, Chain, ChainEngine};
use oracle_nullables::NullStore;
use oracle_store::KvStore;
use oracle_store_lmdb::LmdbEnvironment;
use oracle_utils::format_duration;
use tempfile::TempDir;

use crate::config::{Backend, RunConfig};
use crate::document::ScenarioSpec;
use crate::driver::CommitDriver;
use crate::runner::{RunReport, ScenarioRunner};
use crate::scenario::Scenario;
use crate::{RunFailure, ScenarioError, Step};

/// A reference engine on an empty ledger, owned by one run.
///
/// LMDB-backed environments live in a temporary directory that is removed
/// when the environment is dropped.
pub struct RunEnvironment {
    chain: Chain<dyn KvStore>,
    store: Arc<dyn KvStore>,
    assembler: Assembler,
    driver: CommitDriver,
    require_rollback: bool,
    // Dropped last so the store is closed before its directory goes.
    lmdb_dir: Option<TempDir>,
}

impl RunEnvironment {
    pub fn open(config: &RunConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        let (store, lmdb_dir): (Arc<dyn KvStore>, Option<TempDir>) = match config.backend {
            Backend::Memory => (Arc::new(NullStore::new()), None),
            Backend::Lmdb => {
                let dir = match &config.data_dir {
                    Some(parent) => {
                        std::fs::create_dir_all(parent)?;
                        tempfile::Builder::new().prefix("run-").tempdir_in(parent)?
                    }
                    None => tempfile::Builder::new().prefix("reorg-oracle-").tempdir()?,
                };
                let env = LmdbEnvironment::open(dir.path(), config.lmdb_map_size)
                    .map_err(|e| ScenarioError::Environment(e.to_string()))?;
                (Arc::new(env.kv_store()), Some(dir))
            }
        };

        let chain = Chain::new(Arc::clone(&store), config.params.clone())
            .map_err(|e| ScenarioError::Environment(format!("genesis: {e}")))?;
        tracing::debug!(backend = %config.backend, genesis = %chain.genesis().hash(), "opened run environment");

        Ok(Self {
            chain,
            store,
            assembler: Assembler::new(config.params.clone()),
            driver: CommitDriver::new(config.params.block_interval_secs),
            require_rollback: config.require_rollback,
            lmdb_dir,
        })
    }

    pub fn chain(&self) -> &Chain<dyn KvStore> {
        &self.chain
    }

    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    /// Load `spec` against the current tip and run it.
    pub fn run(&mut self, spec: &ScenarioSpec) -> Result<RunReport, RunFailure> {
        let scenario = Scenario::load(spec, self.chain.height())?;
        ScenarioRunner::new(
            &mut self.chain,
            &*self.store,
            &self.assembler,
            self.driver,
        )
        .require_rollback(self.require_rollback)
        .run(&scenario)
    }
}

/// Run one scenario in a fresh environment, releasing it afterwards.
pub fn run_scenario(
    name: &str,
    spec: &ScenarioSpec,
    config: &RunConfig,
) -> Result<RunReport, RunFailure> {
    let span = tracing::info_span!("scenario", name, backend = %config.backend);
    let _guard = span.enter();
    let started = Instant::now();

    let mut env = RunEnvironment::open(config).map_err(|e| RunFailure::global(Step::Setup, e))?;
    let result = env.run(spec);
    let elapsed = format_duration(started.elapsed());
    match &result {
        Ok(report) => tracing::info!(
            blocks = report.blocks_committed,
            extensions = report.extension_blocks,
            peak_height = report.peak_height,
            final_height = report.final_height,
            rollback = ?report.rollback,
            %elapsed,
            "scenario passed"
        ),
        Err(failure) => tracing::error!(%failure, %elapsed, "scenario failed"),
    }
    result
}
