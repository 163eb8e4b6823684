//! Per-transaction verification outcome recorded by the chain engine.

use serde::{Deserialize, Serialize};

/// Outcome of verifying one transaction of a committed block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifyStatus {
    /// `true` when the transaction was included but its execution failed.
    pub status_fail: bool,
}

impl VerifyStatus {
    pub const SUCCESS: Self = Self { status_fail: false };

    /// Single-byte leaf encoding used by the status commitment.
    pub fn leaf_byte(&self) -> u8 {
        u8::from(self.status_fail)
    }
}
