//! Cryptographic primitives for the reorg oracle.
//!
//! - **Blake2b-256** for every content hash (blocks, transactions, outputs)
//! - A binary Merkle tree used for the transactions root and the
//!   transaction-status commitment

pub mod hash;
pub mod merkle;

pub use hash::{blake2b_256, blake2b_256_multi, derive_output_id, hash_block, hash_transaction};
pub use merkle::merkle_root;
