//! UTXO namespace.
//!
//! Key format: `b"UT:"` ++ 32-byte output id. Values are bincode-encoded
//! [`UtxoEntry`] records.

use oracle_types::{OutputId, UtxoEntry};

use crate::{KvStore, StoreError};

/// Prefix shared by every ledger entry key.
pub const UTXO_PREFIX: &[u8] = b"UT:";

/// Build the storage key for `id`.
pub fn utxo_key(id: &OutputId) -> Vec<u8> {
    let mut key = Vec::with_capacity(UTXO_PREFIX.len() + 32);
    key.extend_from_slice(UTXO_PREFIX);
    key.extend_from_slice(id.as_bytes());
    key
}

pub fn encode_utxo(entry: &UtxoEntry) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(entry)?)
}

pub fn decode_utxo(bytes: &[u8]) -> Result<UtxoEntry, StoreError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Look up the ledger entry for `id`.
pub fn get_utxo<S: KvStore + ?Sized>(
    store: &S,
    id: &OutputId,
) -> Result<Option<UtxoEntry>, StoreError> {
    store
        .get(&utxo_key(id))?
        .map(|bytes| decode_utxo(&bytes))
        .transpose()
}

/// Every ledger entry, keyed by its full storage key, in key order.
pub fn iter_utxos<S: KvStore + ?Sized>(
    store: &S,
) -> Result<Vec<(Vec<u8>, UtxoEntry)>, StoreError> {
    store
        .iter_prefix(UTXO_PREFIX)?
        .into_iter()
        .map(|(key, value)| Ok((key, decode_utxo(&value)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_has_prefix_and_id() {
        let id = OutputId::new([0x11; 32]);
        let key = utxo_key(&id);
        assert!(key.starts_with(UTXO_PREFIX));
        assert_eq!(key.len(), UTXO_PREFIX.len() + 32);
        assert_eq!(OutputId::from_slice(&key[UTXO_PREFIX.len()..]), Some(id));
    }

    #[test]
    fn codec_roundtrip() {
        let entry = UtxoEntry::new(true, 9).mark_spent();
        let bytes = encode_utxo(&entry).unwrap();
        assert_eq!(decode_utxo(&bytes).unwrap(), entry);
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        assert!(matches!(
            decode_utxo(&[0xff]),
            Err(StoreError::Serialization(_))
        ));
    }
}
