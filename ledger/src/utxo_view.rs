//! Working view of the ledger while a block is connected.
//!
//! Changes are staged in memory, transaction by transaction, so a later
//! transaction of the same block sees the outputs of an earlier one. Nothing
//! reaches the store until the caller writes the resulting batch. The first
//! value observed for every touched key is kept in an [`UndoLog`].

use std::collections::HashMap;

use oracle_store::{encode_utxo, get_utxo, utxo_key, KvStore, WriteOp};
use oracle_transactions::{evaluates_true, Transaction, TxInput};
use oracle_types::{Height, OutputId, UtxoEntry};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Ledger state a block overwrote, enough to put it back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoLog {
    entries: Vec<(OutputId, Option<UtxoEntry>)>,
}

impl UndoLog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes that restore every recorded key to its pre-block value.
    pub fn restore_ops(&self) -> Result<Vec<WriteOp>, LedgerError> {
        self.entries
            .iter()
            .rev()
            .map(|(id, before)| entry_op(id, before.as_ref()))
            .collect()
    }
}

/// Staged ledger changes on top of a store.
pub struct UtxoView<'a, S: KvStore + ?Sized> {
    store: &'a S,
    staged: HashMap<OutputId, Option<UtxoEntry>>,
    touched: Vec<OutputId>,
    undo: UndoLog,
}

impl<'a, S: KvStore + ?Sized> UtxoView<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            staged: HashMap::new(),
            touched: Vec::new(),
            undo: UndoLog::default(),
        }
    }

    /// Current entry for `id`, staged changes first.
    pub fn lookup(&self, id: &OutputId) -> Result<Option<UtxoEntry>, LedgerError> {
        match self.staged.get(id) {
            Some(staged) => Ok(*staged),
            None => Ok(get_utxo(self.store, id)?),
        }
    }

    fn stage(&mut self, id: OutputId, value: Option<UtxoEntry>) -> Result<(), LedgerError> {
        if !self.staged.contains_key(&id) {
            let before = get_utxo(self.store, &id)?;
            self.undo.entries.push((id, before));
            self.touched.push(id);
        }
        self.staged.insert(id, value);
        Ok(())
    }

    /// Spend the inputs and create the outputs of `tx`, confirmed at `height`.
    ///
    /// Spent coinbase outputs stay in the ledger flagged as spent; spent
    /// regular outputs are removed.
    pub fn apply_transaction(&mut self, tx: &Transaction, height: Height) -> Result<(), LedgerError> {
        for input in &tx.inputs {
            let TxInput::Spend(spend) = input else {
                continue;
            };
            let id = spend.output_id();
            if !evaluates_true(&spend.control_program) {
                return Err(LedgerError::Unspendable {
                    output_id: id.to_string(),
                });
            }
            let entry = self.lookup(&id)?.ok_or_else(|| LedgerError::MissingUtxo {
                output_id: id.to_string(),
            })?;
            if entry.spent {
                return Err(LedgerError::AlreadySpent {
                    output_id: id.to_string(),
                });
            }
            let after = entry.is_coinbase.then(|| entry.mark_spent());
            self.stage(id, after)?;
        }

        let is_coinbase = tx.is_coinbase();
        for id in tx.result_ids() {
            if self.lookup(&id)?.is_some() {
                return Err(LedgerError::DuplicateOutput {
                    output_id: id.to_string(),
                });
            }
            self.stage(id, Some(UtxoEntry::new(is_coinbase, height)))?;
        }
        Ok(())
    }

    /// The staged changes as a store batch, plus the undo log for them.
    pub fn into_write_set(self) -> Result<(Vec<WriteOp>, UndoLog), LedgerError> {
        let ops = self
            .touched
            .iter()
            .map(|id| entry_op(id, self.staged.get(id).copied().flatten().as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((ops, self.undo))
    }
}

fn entry_op(id: &OutputId, entry: Option<&UtxoEntry>) -> Result<WriteOp, LedgerError> {
    let key = utxo_key(id);
    Ok(match entry {
        Some(entry) => WriteOp::Put {
            key,
            value: encode_utxo(entry)?,
        },
        None => WriteOp::Delete { key },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_nullables::NullStore;
    use oracle_store::iter_utxos;
    use oracle_transactions::{always_true, CoinbaseInput, SpendInput, TxOutput, TX_VERSION};
    use oracle_types::{Amount, AssetId};

    fn coinbase(height: u64) -> Transaction {
        Transaction::new(
            TX_VERSION,
            vec![TxInput::Coinbase(CoinbaseInput::for_height(height))],
            vec![TxOutput::new(AssetId::NATIVE, Amount::new(50), always_true())],
        )
    }

    fn spend(src: &Transaction, position: usize, amounts: &[u64]) -> Transaction {
        Transaction::new(
            TX_VERSION,
            vec![TxInput::Spend(SpendInput::from_output(src, position).unwrap())],
            amounts
                .iter()
                .map(|a| TxOutput::new(AssetId::NATIVE, Amount::new(*a), always_true()))
                .collect(),
        )
    }

    fn commit(store: &NullStore, txs: &[Transaction], height: u64) -> UndoLog {
        let mut view = UtxoView::new(store);
        for tx in txs {
            view.apply_transaction(tx, height).unwrap();
        }
        let (ops, undo) = view.into_write_set().unwrap();
        store.write_batch(&ops).unwrap();
        undo
    }

    #[test]
    fn spent_coinbase_is_kept_as_tombstone() {
        let store = NullStore::new();
        let cb = coinbase(0);
        commit(&store, &[cb.clone()], 0);

        let tx = spend(&cb, 0, &[10, 20]);
        commit(&store, &[tx.clone()], 1);

        let cb_entry = get_utxo(&store, &cb.output_id(0).unwrap()).unwrap().unwrap();
        assert!(cb_entry.is_coinbase && cb_entry.spent);
        for id in tx.result_ids() {
            let e = get_utxo(&store, &id).unwrap().unwrap();
            assert_eq!(e, UtxoEntry::new(false, 1));
        }
    }

    #[test]
    fn spent_regular_output_is_removed() {
        let store = NullStore::new();
        let cb = coinbase(0);
        let a = spend(&cb, 0, &[10]);
        let b = spend(&a, 0, &[9]);
        commit(&store, &[cb, a.clone()], 0);
        commit(&store, &[b], 1);
        assert_eq!(get_utxo(&store, &a.output_id(0).unwrap()).unwrap(), None);
    }

    #[test]
    fn intra_block_spend_sees_staged_output() {
        let store = NullStore::new();
        let cb = coinbase(0);
        commit(&store, &[cb.clone()], 0);

        let a = spend(&cb, 0, &[10]);
        let b = spend(&a, 0, &[9]);
        commit(&store, &[a.clone(), b.clone()], 1);

        assert_eq!(get_utxo(&store, &a.output_id(0).unwrap()).unwrap(), None);
        assert!(get_utxo(&store, &b.output_id(0).unwrap()).unwrap().is_some());
    }

    #[test]
    fn double_spend_is_rejected() {
        let store = NullStore::new();
        let cb = coinbase(0);
        commit(&store, &[cb.clone()], 0);

        let mut view = UtxoView::new(&store);
        view.apply_transaction(&spend(&cb, 0, &[1]), 1).unwrap();
        let err = view.apply_transaction(&spend(&cb, 0, &[2]), 1).unwrap_err();
        assert!(matches!(err, LedgerError::AlreadySpent { .. }));
    }

    #[test]
    fn undo_restores_previous_state() {
        let store = NullStore::new();
        let cb = coinbase(0);
        commit(&store, &[cb.clone()], 0);
        let before = iter_utxos(&store).unwrap();

        let a = spend(&cb, 0, &[10]);
        let b = spend(&a, 0, &[9, 1]);
        let undo = commit(&store, &[coinbase(1), a, b], 1);
        assert_ne!(iter_utxos(&store).unwrap(), before);

        store.write_batch(&undo.restore_ops().unwrap()).unwrap();
        assert_eq!(iter_utxos(&store).unwrap(), before);
    }
}
