//! Incremental transaction builder.

use crate::validation::validate_structure;
use crate::{Transaction, TransactionError, TxInput, TxOutput, TX_VERSION};

/// Collects inputs and outputs in call order, then finalizes a transaction.
#[derive(Debug)]
pub struct TxBuilder {
    version: u64,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
}

impl Default for TxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TxBuilder {
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn add_input(&mut self, input: TxInput) -> &mut Self {
        self.inputs.push(input);
        self
    }

    pub fn add_output(&mut self, output: TxOutput) -> &mut Self {
        self.outputs.push(output);
        self
    }

    /// Finalize the transaction, rejecting structurally invalid ones.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        let tx = Transaction::new(self.version, self.inputs, self.outputs);
        validate_structure(&tx)?;
        Ok(tx)
    }
}
