//! Turns resolved input references into concrete spends.

use oracle_ledger::ChainEngine;
use oracle_transactions::{SpendInput, Transaction};

use crate::scenario::InputRef;
use crate::ReferenceError;

/// Resolves references against the main chain and against the
/// transactions already synthesized for the block under construction.
pub struct InputResolver<'a, C: ChainEngine + ?Sized> {
    chain: &'a C,
    in_flight: &'a [Transaction],
}

impl<'a, C: ChainEngine + ?Sized> InputResolver<'a, C> {
    /// `in_flight` are the user transactions of the current block, in order,
    /// without the coinbase.
    pub fn new(chain: &'a C, in_flight: &'a [Transaction]) -> Self {
        Self { chain, in_flight }
    }

    pub fn resolve(&self, input: &InputRef) -> Result<SpendInput, ReferenceError> {
        match *input {
            InputRef::Historical {
                height,
                tx_index,
                output_index,
            } => {
                let block = self
                    .chain
                    .block_by_height(height)
                    .map_err(|_| ReferenceError::HeightNotFound { height })?;
                let tx = block.transactions.get(tx_index).ok_or(
                    ReferenceError::TxIndexOutOfRange {
                        height,
                        tx_index,
                        count: block.transactions.len(),
                    },
                )?;
                spend_output(tx, output_index)
            }
            InputRef::IntraBlock {
                tx_index,
                output_index,
            } => {
                let tx = tx_index
                    .checked_sub(1)
                    .and_then(|i| self.in_flight.get(i))
                    .ok_or(ReferenceError::IntraBlockIndexOutOfRange {
                        tx_index,
                        built: self.in_flight.len(),
                    })?;
                spend_output(tx, output_index)
            }
        }
    }
}

fn spend_output(tx: &Transaction, output_index: usize) -> Result<SpendInput, ReferenceError> {
    SpendInput::from_output(tx, output_index).map_err(|_| ReferenceError::OutputIndexOutOfRange {
        output_index,
        count: tx.outputs.len(),
    })
}
