//! Transaction inputs.

use oracle_crypto::derive_output_id;
use oracle_types::{Amount, AssetId, Height, OutputId, TxHash};
use serde::{Deserialize, Serialize};

use crate::{Transaction, TransactionError};

/// One input of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxInput {
    /// Mints the block reward. Only valid as the sole input of the first
    /// transaction in a block.
    Coinbase(CoinbaseInput),
    /// Consumes an existing output.
    Spend(SpendInput),
}

impl TxInput {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Coinbase(cb) => {
                buf.push(0);
                buf.extend_from_slice(&(cb.arbitrary.len() as u32).to_le_bytes());
                buf.extend_from_slice(&cb.arbitrary);
            }
            Self::Spend(spend) => {
                buf.push(1);
                buf.extend_from_slice(spend.output_id().as_bytes());
            }
        }
    }
}

/// Free-form payload of a coinbase input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinbaseInput {
    pub arbitrary: Vec<u8>,
}

impl CoinbaseInput {
    /// Coinbase payload committing to the block height, which keeps every
    /// coinbase transaction hash unique.
    pub fn for_height(height: Height) -> Self {
        Self {
            arbitrary: height.to_le_bytes().to_vec(),
        }
    }
}

/// A spend of output `source_position` of transaction `source_tx`.
///
/// Carries a copy of the spent output so the spent identifier can be
/// recomputed without a lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendInput {
    pub source_tx: TxHash,
    pub source_position: u32,
    pub asset: AssetId,
    pub amount: Amount,
    pub control_program: Vec<u8>,
}

impl SpendInput {
    /// Spend output `position` of `tx`.
    pub fn from_output(tx: &Transaction, position: usize) -> Result<Self, TransactionError> {
        let output = tx
            .outputs
            .get(position)
            .ok_or(TransactionError::OutputIndexOutOfRange {
                tx_hash: tx.hash.to_string(),
                index: position,
                count: tx.outputs.len(),
            })?;
        Ok(Self {
            source_tx: tx.hash,
            source_position: position as u32,
            asset: output.asset,
            amount: output.amount,
            control_program: output.control_program.clone(),
        })
    }

    /// Identifier of the output this input consumes.
    pub fn output_id(&self) -> OutputId {
        derive_output_id(
            &self.source_tx,
            self.source_position,
            &self.asset,
            self.amount,
            &self.control_program,
        )
    }
}
