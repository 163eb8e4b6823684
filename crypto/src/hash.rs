//! Blake2b hashing for blocks, transactions and outputs.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use oracle_types::{Amount, AssetId, BlockHash, OutputId, TxHash};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash a serialized block header to produce its `BlockHash`.
pub fn hash_block(header_bytes: &[u8]) -> BlockHash {
    BlockHash::new(blake2b_256(header_bytes))
}

/// Hash a serialized transaction body to produce its `TxHash`.
pub fn hash_transaction(tx_bytes: &[u8]) -> TxHash {
    TxHash::new(blake2b_256(tx_bytes))
}

/// Derive the identifier of output `position` of transaction `source`.
pub fn derive_output_id(
    source: &TxHash,
    position: u32,
    asset: &AssetId,
    amount: Amount,
    control_program: &[u8],
) -> OutputId {
    OutputId::new(blake2b_256_multi(&[
        b"output",
        source.as_bytes(),
        &position.to_le_bytes(),
        asset.as_bytes(),
        &amount.raw().to_le_bytes(),
        control_program,
    ]))
}
