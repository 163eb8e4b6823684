//! Ledger entry stored for every transaction output the chain still tracks.

use serde::{Deserialize, Serialize};

use crate::Height;

/// A record of an unspent output, or the tombstone of a spent coinbase output.
///
/// Spent non-coinbase outputs are removed from the ledger outright, so an entry
/// with `spent == true` only ever exists for coinbase outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub is_coinbase: bool,
    pub spent: bool,
    /// Height of the block that created the output.
    pub block_height: Height,
}

impl UtxoEntry {
    /// A freshly created, spendable entry.
    pub fn new(is_coinbase: bool, block_height: Height) -> Self {
        Self {
            is_coinbase,
            spent: false,
            block_height,
        }
    }

    /// Copy of this entry flagged as spent.
    pub fn mark_spent(self) -> Self {
        Self {
            spent: true,
            ..self
        }
    }
}
