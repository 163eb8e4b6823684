//! Transaction outputs.

use oracle_crypto::derive_output_id;
use oracle_types::{Amount, AssetId, OutputId, TxHash};
use serde::{Deserialize, Serialize};

/// An amount of an asset locked by a control program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub asset: AssetId,
    pub amount: Amount,
    pub control_program: Vec<u8>,
}

impl TxOutput {
    pub fn new(asset: AssetId, amount: Amount, control_program: Vec<u8>) -> Self {
        Self {
            asset,
            amount,
            control_program,
        }
    }

    /// Identifier of this output when it sits at `position` of transaction `source`.
    pub fn id(&self, source: &TxHash, position: u32) -> OutputId {
        derive_output_id(
            source,
            position,
            &self.asset,
            self.amount,
            &self.control_program,
        )
    }

    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.asset.as_bytes());
        buf.extend_from_slice(&self.amount.raw().to_le_bytes());
        buf.extend_from_slice(&(self.control_program.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.control_program);
    }
}
