//! Ledger snapshots and rollback verification.

use std::collections::BTreeMap;

use oracle_ledger::{Block, ChainEngine};
use oracle_store::{iter_utxos, KvStore, StoreError, UTXO_PREFIX};
use oracle_types::{OutputId, UtxoEntry};

use crate::validator::validate_status;
use crate::{RollbackViolation, ScenarioError};

/// Every ledger entry at one point in time, keyed by storage key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    entries: BTreeMap<Vec<u8>, UtxoEntry>,
}

impl LedgerSnapshot {
    pub fn capture<S: KvStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self {
            entries: iter_utxos(store)?.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &UtxoEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// `after` holds exactly the entries of `self`, with equal values.
    pub fn ensure_matches(&self, after: &LedgerSnapshot) -> Result<(), RollbackViolation> {
        if self.len() != after.len() {
            return Err(RollbackViolation::SizeMismatch {
                before: self.len(),
                after: after.len(),
            });
        }
        for (key, before) in &self.entries {
            match after.entries.get(key) {
                None => {
                    return Err(RollbackViolation::EntryMissing {
                        key: describe_key(key),
                        before: *before,
                    })
                }
                Some(entry) if entry != before => {
                    return Err(RollbackViolation::EntryChanged {
                        key: describe_key(key),
                        before: *before,
                        after: *entry,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Ledger keys read back as output ids when they have the ledger shape.
fn describe_key(key: &[u8]) -> String {
    key.strip_prefix(UTXO_PREFIX)
        .and_then(OutputId::from_slice)
        .map_or_else(|| hex::encode(key), |id| id.to_string())
}

/// The block to roll back to and the ledger as it stood right after it.
#[derive(Clone, Debug)]
pub struct RollbackCheckpoint {
    pub block: Block,
    pub snapshot: LedgerSnapshot,
}

impl RollbackCheckpoint {
    /// Reorganize `chain` back to the checkpoint block and check that the
    /// ledger equals the snapshot and the block is canonical again.
    pub fn verify<C, S>(&self, chain: &mut C, store: &S) -> Result<(), ScenarioError>
    where
        C: ChainEngine + ?Sized,
        S: KvStore + ?Sized,
    {
        chain
            .reorganize_to(&self.block)
            .map_err(ScenarioError::Commit)?;
        let after = LedgerSnapshot::capture(store)?;
        self.snapshot.ensure_matches(&after)?;
        validate_status(&*chain, &self.block).map_err(RollbackViolation::Status)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_nullables::NullStore;
    use oracle_store::{encode_utxo, utxo_key};

    fn put(store: &NullStore, byte: u8, entry: UtxoEntry) {
        store
            .put(
                &utxo_key(&OutputId::new([byte; 32])),
                &encode_utxo(&entry).unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn capture_ignores_other_namespaces() {
        let store = NullStore::new();
        put(&store, 1, UtxoEntry::new(true, 0));
        store.put(b"XX:other", b"value").unwrap();
        let snapshot = LedgerSnapshot::capture(&store).unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn identical_ledgers_match() {
        let store = NullStore::new();
        put(&store, 1, UtxoEntry::new(true, 0).mark_spent());
        put(&store, 2, UtxoEntry::new(false, 1));
        let a = LedgerSnapshot::capture(&store).unwrap();
        let b = LedgerSnapshot::capture(&store).unwrap();
        a.ensure_matches(&b).unwrap();
    }

    #[test]
    fn size_difference_is_reported_first() {
        let store = NullStore::new();
        put(&store, 1, UtxoEntry::new(true, 0));
        let before = LedgerSnapshot::capture(&store).unwrap();
        put(&store, 2, UtxoEntry::new(false, 1));
        let after = LedgerSnapshot::capture(&store).unwrap();
        assert!(matches!(
            before.ensure_matches(&after),
            Err(RollbackViolation::SizeMismatch { before: 1, after: 2 })
        ));
    }

    #[test]
    fn swapped_key_is_missing() {
        let before_store = NullStore::new();
        put(&before_store, 1, UtxoEntry::new(false, 1));
        let after_store = NullStore::new();
        put(&after_store, 2, UtxoEntry::new(false, 1));
        let before = LedgerSnapshot::capture(&before_store).unwrap();
        let after = LedgerSnapshot::capture(&after_store).unwrap();
        match before.ensure_matches(&after) {
            Err(RollbackViolation::EntryMissing { key, .. }) => {
                assert_eq!(key, OutputId::new([1; 32]).to_string());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn flipped_spent_flag_is_a_change() {
        let store = NullStore::new();
        put(&store, 1, UtxoEntry::new(true, 0));
        let before = LedgerSnapshot::capture(&store).unwrap();
        put(&store, 1, UtxoEntry::new(true, 0).mark_spent());
        let after = LedgerSnapshot::capture(&store).unwrap();
        assert!(matches!(
            before.ensure_matches(&after),
            Err(RollbackViolation::EntryChanged { .. })
        ));
    }
}
