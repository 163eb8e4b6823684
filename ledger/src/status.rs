//! Transaction-status commitment.

use oracle_crypto::{blake2b_256, merkle_root};
use oracle_types::VerifyStatus;
use serde::{Deserialize, Serialize};

/// Verification outcome of every transaction of one block, in block order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub verify_status: Vec<VerifyStatus>,
}

impl TransactionStatus {
    /// All `count` transactions verified successfully.
    pub fn all_success(count: usize) -> Self {
        Self {
            verify_status: vec![VerifyStatus::SUCCESS; count],
        }
    }

    pub fn root(&self) -> [u8; 32] {
        status_root(&self.verify_status)
    }
}

/// Merkle root over per-transaction verification outcomes.
pub fn status_root(statuses: &[VerifyStatus]) -> [u8; 32] {
    let leaves: Vec<[u8; 32]> = statuses
        .iter()
        .map(|s| blake2b_256(&[s.leaf_byte()]))
        .collect();
    merkle_root(&leaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_changes_root() {
        let ok = TransactionStatus::all_success(3);
        let mut failed = ok.clone();
        failed.verify_status[1].status_fail = true;
        assert_ne!(ok.root(), failed.root());
    }

    #[test]
    fn root_depends_on_count() {
        assert_ne!(
            TransactionStatus::all_success(1).root(),
            TransactionStatus::all_success(2).root()
        );
    }
}
