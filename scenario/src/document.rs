//! The JSON scenario document, as written by scenario authors.

use std::path::Path;

use oracle_types::{Amount, Height};
use serde::{Deserialize, Serialize};

use crate::ScenarioError;

/// A whole scenario: blocks to commit in order, and an optional height to
/// roll back to afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_to: Option<Height>,
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockSpec {
    /// User transactions, placed after the coinbase.
    #[serde(default)]
    pub transactions: Vec<TransactionSpec>,
    /// Empty blocks to mine on top once this one is committed.
    #[serde(default)]
    pub append: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionSpec {
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
    #[serde(default)]
    pub outputs: Vec<Amount>,
}

/// Names an output by position: main-chain height, index of the
/// transaction in that block (the coinbase is 0), index of the output.
///
/// A height equal to the block being built refers to a transaction earlier
/// in that same block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSpec {
    pub height: Height,
    pub tx_index: usize,
    pub output_index: usize,
}

impl ScenarioSpec {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
