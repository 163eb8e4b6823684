//! Stateless transaction validation.
//!
//! Only structure is checked here. Whether spent outputs exist and are still
//! unspent is decided by the chain engine against its ledger.

use std::collections::HashSet;

use crate::error::TransactionError;
use crate::{Transaction, TxInput};

/// Validate a transaction's shape: non-empty, positive amounts, a coinbase
/// input only on its own, and no output spent twice.
pub fn validate_structure(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.inputs.is_empty() {
        return Err(TransactionError::EmptyInputs);
    }
    if tx.outputs.is_empty() {
        return Err(TransactionError::EmptyOutputs);
    }
    if let Some(index) = tx.outputs.iter().position(|o| o.amount.is_zero()) {
        return Err(TransactionError::ZeroAmount { index });
    }

    let coinbase_inputs = tx
        .inputs
        .iter()
        .filter(|i| matches!(i, TxInput::Coinbase(_)))
        .count();
    if coinbase_inputs > 0 && tx.inputs.len() > 1 {
        return Err(TransactionError::MisplacedCoinbase);
    }

    let mut seen = HashSet::new();
    for id in tx.spent_output_ids() {
        if !seen.insert(id) {
            return Err(TransactionError::DuplicateSpend {
                output_id: id.to_string(),
            });
        }
    }
    Ok(())
}
