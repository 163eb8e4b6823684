//! Run configuration with TOML file support.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use oracle_types::ChainParams;
use oracle_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::ScenarioError;

/// Which store the reference engine keeps its ledger in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process ordered map.
    #[default]
    Memory,
    /// LMDB environment in a per-run directory.
    Lmdb,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "lmdb" => Ok(Self::Lmdb),
            _ => Err(format!("unknown backend {s:?}, expected \"memory\" or \"lmdb\"")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Lmdb => "lmdb",
        })
    }
}

/// Settings shared by every scenario of one invocation.
///
/// Loaded from a TOML file via [`RunConfig::from_toml_file`] or built in
/// code; every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Parent directory for per-run LMDB environments. The system temporary
    /// directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Fail runs that never capture a rollback checkpoint.
    #[serde(default)]
    pub require_rollback: bool,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub params: ChainParams,
}

fn default_lmdb_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: None,
            lmdb_map_size: default_lmdb_map_size(),
            require_rollback: false,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: ChainParams::default(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ScenarioError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters under which no child block can ever be committed.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.params.block_interval_secs == 0 {
            return Err(ScenarioError::InvalidParams {
                field: "block_interval_secs",
                reason: "children must be timestamped after their parent",
            });
        }
        Ok(())
    }

    /// Configuration for fast in-process runs: memory backend, trivial work.
    pub fn dev() -> Self {
        Self {
            params: ChainParams::dev(),
            ..Self::default()
        }
    }
}
