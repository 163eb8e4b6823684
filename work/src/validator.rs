//! PoW validation.

use oracle_crypto::blake2b_256_multi;
use oracle_types::BlockHash;

/// The work value a nonce achieves for a given block.
pub fn work_value(block_hash: &BlockHash, nonce: u64) -> u64 {
    let hash = blake2b_256_multi(&[block_hash.as_bytes(), &nonce.to_le_bytes()]);
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(head)
}

/// Validate that a work nonce meets the minimum difficulty for a given block.
pub fn validate_work(block_hash: &BlockHash, nonce: u64, min_difficulty: u64) -> bool {
    work_value(block_hash, nonce) >= min_difficulty
}
