//! reorg-oracle: runs scenario files against the reference chain engine.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use oracle_scenario::{
    run_scenario, Backend, RollbackOutcome, RunConfig, RunReport, Scenario, ScenarioSpec,
};
use oracle_types::ChainParams;
use oracle_utils::LogFormat;

#[derive(Parser)]
#[command(
    name = "reorg-oracle",
    about = "Drive a chain engine through scenarios and verify reorganization"
)]
struct Cli {
    /// Path to a TOML run configuration. CLI flags and env vars override it.
    #[arg(long, global = true, env = "ORACLE_CONFIG")]
    config: Option<PathBuf>,

    /// Ledger store: "memory" or "lmdb".
    #[arg(long, global = true, env = "ORACLE_BACKEND")]
    backend: Option<Backend>,

    /// Parent directory for per-run LMDB environments.
    #[arg(long, global = true, env = "ORACLE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Fail scenarios that never capture a rollback checkpoint.
    #[arg(long, global = true, env = "ORACLE_REQUIRE_ROLLBACK")]
    require_rollback: bool,

    /// Use trivial proof-of-work.
    #[arg(long, global = true, env = "ORACLE_DEV")]
    dev: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "ORACLE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "ORACLE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run scenario files, each in a fresh engine.
    Run {
        /// Scenario documents (JSON).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Run every file even after a failure.
        #[arg(long)]
        keep_going: bool,
    },
    /// Parse scenario files and resolve their references without running them.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn resolve_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    config.require_rollback |= cli.require_rollback;
    if cli.dev {
        config.params.genesis_bits = ChainParams::dev().genesis_bits;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn scenario_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn describe(report: &RunReport) -> String {
    let rollback = match &report.rollback {
        RollbackOutcome::Verified { height, entries, .. } => {
            format!("rollback to {height} verified ({entries} entries)")
        }
        RollbackOutcome::NotRequested => "no rollback requested".to_string(),
        RollbackOutcome::TargetNotReached { target } => {
            format!("rollback target {target} not reached")
        }
    };
    format!(
        "{} blocks, {} extensions, peak height {}; {}",
        report.blocks_committed, report.extension_blocks, report.peak_height, rollback
    )
}

fn run_files(files: &[PathBuf], keep_going: bool, config: &RunConfig) -> usize {
    let mut failed = 0;
    for path in files {
        let name = scenario_name(path);
        let outcome = ScenarioSpec::from_file(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))
            .and_then(|spec| run_scenario(&name, &spec, config).map_err(anyhow::Error::from));
        match outcome {
            Ok(report) => println!("PASS {name}: {}", describe(&report)),
            Err(err) => {
                println!("FAIL {name}: {err:#}");
                failed += 1;
                if !keep_going {
                    break;
                }
            }
        }
    }
    failed
}

fn check_files(files: &[PathBuf]) -> usize {
    let mut failed = 0;
    for path in files {
        let name = scenario_name(path);
        let outcome = ScenarioSpec::from_file(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))
            .and_then(|spec| Scenario::load(&spec, 0).map_err(anyhow::Error::from));
        match outcome {
            Ok(scenario) => println!(
                "OK   {name}: {} blocks up to height {}, checkpoint block {}",
                scenario.blocks.len(),
                scenario.final_height(),
                scenario
                    .checkpoint_block()
                    .map_or_else(|| "none".to_string(), |i| i.to_string())
            ),
            Err(err) => {
                println!("FAIL {name}: {err:#}");
                failed += 1;
            }
        }
    }
    failed
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    oracle_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let failed = match &cli.command {
        Command::Run { files, keep_going } => {
            tracing::info!(
                backend = %config.backend,
                files = files.len(),
                require_rollback = config.require_rollback,
                "running scenarios"
            );
            run_files(files, *keep_going, &config)
        }
        Command::Check { files } => check_files(files),
    };

    if failed > 0 {
        tracing::error!(failed, "scenario failures");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GOOD: &str = r#"{ "blocks": [ { "transactions": [ { "inputs": [ { "height": 0, "tx_index": 0, "output_index": 0 } ], "outputs": [ 10, 20 ] } ] } ] }"#;

    fn write_files(dir: &Path) -> Vec<PathBuf> {
        let bad = dir.join("bad.json");
        let good = dir.join("good.json");
        fs::write(&bad, "{ not json").unwrap();
        fs::write(&good, GOOD).unwrap();
        vec![bad, good]
    }

    #[test]
    fn keep_going_runs_past_unreadable_document() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path());
        assert_eq!(run_files(&files, true, &RunConfig::dev()), 1);
    }

    #[test]
    fn unreadable_document_stops_run_without_keep_going() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_files(dir.path());
        files.push(dir.path().join("missing.json"));
        assert_eq!(run_files(&files, false, &RunConfig::dev()), 1);
    }

    #[test]
    fn check_reports_every_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_files(dir.path());
        files.push(dir.path().join("missing.json"));
        assert_eq!(check_files(&files), 2);
    }
}
