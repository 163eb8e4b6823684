//! Block format.

use oracle_crypto::{blake2b_256_multi, merkle_root};
use oracle_transactions::Transaction;
use oracle_types::{BlockHash, Height, Timestamp};
use serde::{Deserialize, Serialize};

/// Current block format version.
pub const BLOCK_VERSION: u64 = 1;

/// Block header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u64,
    pub height: Height,
    /// Hash of the parent block (zero for genesis).
    pub previous: BlockHash,
    pub timestamp: Timestamp,
    /// Minimum work value for this block.
    pub bits: u64,
    /// Proof-of-work nonce. Not covered by the block hash.
    pub nonce: u64,
    /// Merkle root of the transaction hashes, coinbase first.
    pub transactions_root: [u8; 32],
    /// Merkle root of the per-transaction verification outcomes.
    pub transaction_status_hash: [u8; 32],
}

impl BlockHeader {
    /// Compute the block hash over every header field except the nonce.
    pub fn hash(&self) -> BlockHash {
        BlockHash::new(blake2b_256_multi(&[
            &self.version.to_le_bytes(),
            &self.height.to_le_bytes(),
            self.previous.as_bytes(),
            &self.timestamp.as_secs().to_le_bytes(),
            &self.bits.to_le_bytes(),
            &self.transactions_root,
            &self.transaction_status_hash,
        ]))
    }
}

/// A block: header plus ordered transactions, coinbase first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn hash(&self) -> BlockHash {
        self.header.hash()
    }

    pub fn height(&self) -> Height {
        self.header.height
    }

    pub fn previous(&self) -> BlockHash {
        self.header.previous
    }

    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp
    }

    pub fn bits(&self) -> u64 {
        self.header.bits
    }

    /// The block's embedded transaction-status commitment.
    pub fn transaction_status_hash(&self) -> [u8; 32] {
        self.header.transaction_status_hash
    }
}

/// Merkle root over the hashes of `txs`, in order.
pub fn transactions_root(txs: &[Transaction]) -> [u8; 32] {
    let leaves: Vec<[u8; 32]> = txs.iter().map(|tx| *tx.hash.as_bytes()).collect();
    merkle_root(&leaves)
}
