//! UTXO transactions for the reference chain.
//!
//! A transaction consumes outputs of earlier transactions (spend inputs) or
//! mints new value (a single coinbase input), and produces an ordered list of
//! outputs. Output identifiers are content hashes derived from the producing
//! transaction, so input order and output order are both observable.

pub mod builder;
pub mod error;
pub mod input;
pub mod output;
pub mod program;
pub mod validation;

pub use builder::TxBuilder;
pub use error::TransactionError;
pub use input::{CoinbaseInput, SpendInput, TxInput};
pub use output::TxOutput;
pub use program::{always_true, evaluates_true, OP_TRUE};
pub use validation::validate_structure;

use oracle_crypto::hash_transaction;
use oracle_types::{OutputId, TxHash};
use serde::{Deserialize, Serialize};

/// Current transaction format version.
pub const TX_VERSION: u64 = 1;

/// A finalized transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Hash of the fields above.
    pub hash: TxHash,
}

impl Transaction {
    /// Assemble a transaction and compute its hash.
    pub fn new(version: u64, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        let mut tx = Self {
            version,
            inputs,
            outputs,
            hash: TxHash::ZERO,
        };
        tx.hash = tx.compute_hash();
        tx
    }

    /// Hash the canonical encoding of version, inputs and outputs.
    pub fn compute_hash(&self) -> TxHash {
        let mut buf = Vec::with_capacity(64 * (self.inputs.len() + self.outputs.len()) + 8);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&(self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            input.encode_into(&mut buf);
        }
        buf.extend_from_slice(&(self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            output.encode_into(&mut buf);
        }
        hash_transaction(&buf)
    }

    /// Whether this transaction mints the block reward.
    pub fn is_coinbase(&self) -> bool {
        matches!(self.inputs.as_slice(), [TxInput::Coinbase(_)])
    }

    /// Identifiers of every output consumed by this transaction, in input order.
    pub fn spent_output_ids(&self) -> Vec<OutputId> {
        self.inputs
            .iter()
            .filter_map(|input| match input {
                TxInput::Spend(spend) => Some(spend.output_id()),
                TxInput::Coinbase(_) => None,
            })
            .collect()
    }

    /// Identifier of the output at `position`, if it exists.
    pub fn output_id(&self, position: usize) -> Option<OutputId> {
        self.outputs
            .get(position)
            .map(|out| out.id(&self.hash, position as u32))
    }

    /// Identifiers of every output produced by this transaction, in output order.
    pub fn result_ids(&self) -> Vec<OutputId> {
        self.outputs
            .iter()
            .enumerate()
            .map(|(i, out)| out.id(&self.hash, i as u32))
            .collect()
    }
}
