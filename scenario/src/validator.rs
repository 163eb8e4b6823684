//! Post-commit checks on the engine's view of a block and on the ledger.

use std::collections::HashSet;

use oracle_ledger::{status_root, Block, ChainEngine};
use oracle_store::{get_utxo, KvStore};

use crate::InvariantViolation;

/// `block` is canonical at its height, the engine agrees on how to find it,
/// and its recorded transaction statuses hash to the header commitment.
pub fn validate_status<C: ChainEngine + ?Sized>(
    chain: &C,
    block: &Block,
) -> Result<(), InvariantViolation> {
    let hash = block.hash();
    let height = block.height();

    if !chain.in_main_chain(height, &hash) {
        return Err(InvariantViolation::NotInMainChain { height, hash });
    }

    let best = chain.best_block().hash();
    if best != hash {
        return Err(InvariantViolation::BestBlockMismatch {
            expected: hash,
            actual: best,
        });
    }

    let by_height = chain
        .block_by_height(height)
        .map_err(InvariantViolation::Engine)?
        .hash();
    if by_height != hash {
        return Err(InvariantViolation::HeightLookupMismatch {
            height,
            expected: hash,
            actual: by_height,
        });
    }

    let status = chain
        .transaction_status(&hash)
        .map_err(InvariantViolation::Engine)?;
    let root = status_root(&status.verify_status);
    let committed = block.transaction_status_hash();
    if root != committed {
        return Err(InvariantViolation::StatusRootMismatch {
            expected: hex::encode(committed),
            actual: hex::encode(root),
        });
    }
    Ok(())
}

/// Every output `block` spent is gone from the ledger, or remains as a spent
/// coinbase entry. Every output it created is either spent later in the same
/// block or present, unspent, at the block's height.
pub fn validate_execution<S: KvStore + ?Sized>(
    store: &S,
    block: &Block,
) -> Result<(), InvariantViolation> {
    let height = block.height();
    let mut spent_in_block = HashSet::new();

    for tx in &block.transactions {
        for output_id in tx.spent_output_ids() {
            spent_in_block.insert(output_id);
            let Some(entry) = get_utxo(store, &output_id)? else {
                continue;
            };
            if !entry.is_coinbase {
                return Err(InvariantViolation::SpentEntryNotCoinbase {
                    tx_hash: tx.hash,
                    output_id,
                });
            }
            if !entry.spent {
                return Err(InvariantViolation::SpentEntryNotMarked {
                    tx_hash: tx.hash,
                    output_id,
                });
            }
        }
    }

    for tx in &block.transactions {
        for output_id in tx.result_ids() {
            match get_utxo(store, &output_id)? {
                None if spent_in_block.contains(&output_id) => {}
                None => {
                    return Err(InvariantViolation::OutputMissing {
                        tx_hash: tx.hash,
                        output_id,
                    })
                }
                Some(entry) => {
                    if entry.block_height != height {
                        return Err(InvariantViolation::OutputHeightMismatch {
                            output_id,
                            expected: height,
                            actual: entry.block_height,
                        });
                    }
                    if entry.spent {
                        return Err(InvariantViolation::OutputSpent { output_id, height });
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_ledger::{Assembler, BlockAssembler, Chain};
    use oracle_nullables::NullStore;
    use oracle_store::{encode_utxo, utxo_key};
    use oracle_transactions::{always_true, SpendInput, TxBuilder, TxInput, TxOutput};
    use oracle_types::{Amount, AssetId, ChainParams, UtxoEntry};
    use std::sync::Arc;

    /// A chain with one committed block spending the genesis coinbase into
    /// two outputs.
    fn committed() -> (Chain<NullStore>, Block) {
        let params = ChainParams::dev();
        let mut chain = Chain::new(Arc::new(NullStore::new()), params.clone()).unwrap();
        let assembler = Assembler::new(params);
        let coinbase = chain.genesis().transactions[0].clone();
        let mut builder = TxBuilder::new();
        builder
            .add_input(TxInput::Spend(SpendInput::from_output(&coinbase, 0).unwrap()))
            .add_output(TxOutput::new(AssetId::NATIVE, Amount::new(10), always_true()))
            .add_output(TxOutput::new(AssetId::NATIVE, Amount::new(20), always_true()));
        let tx = builder.build().unwrap();
        let mut block = assembler.new_block(&chain, vec![tx], &always_true()).unwrap();
        assembler.solve(&mut block).unwrap();
        chain.process_block(block.clone()).unwrap();
        (chain, block)
    }

    #[test]
    fn committed_block_passes_both_checks() {
        let (chain, block) = committed();
        validate_status(&chain, &block).unwrap();
        validate_execution(&**chain.store(), &block).unwrap();
    }

    #[test]
    fn genesis_fails_status_once_superseded() {
        let (chain, _) = committed();
        let err = validate_status(&chain, chain.genesis()).unwrap_err();
        assert!(matches!(err, InvariantViolation::BestBlockMismatch { .. }));
    }

    #[test]
    fn unknown_block_is_not_in_main_chain() {
        let (chain, block) = committed();
        let mut stranger = block.clone();
        stranger.header.timestamp = stranger.header.timestamp.plus_secs(1);
        let err = validate_status(&chain, &stranger).unwrap_err();
        assert!(matches!(err, InvariantViolation::NotInMainChain { height: 1, .. }));
    }

    #[test]
    fn detects_output_recorded_at_wrong_height() {
        let (chain, block) = committed();
        let id = block.transactions[1].output_id(0).unwrap();
        chain
            .store()
            .put(&utxo_key(&id), &encode_utxo(&UtxoEntry::new(false, 9)).unwrap())
            .unwrap();
        let err = validate_execution(&**chain.store(), &block).unwrap_err();
        assert!(matches!(
            err,
            InvariantViolation::OutputHeightMismatch {
                expected: 1,
                actual: 9,
                ..
            }
        ));
    }

    #[test]
    fn detects_missing_output() {
        let (chain, block) = committed();
        let id = block.transactions[1].output_id(1).unwrap();
        chain.store().delete(&utxo_key(&id)).unwrap();
        let err = validate_execution(&**chain.store(), &block).unwrap_err();
        assert!(matches!(err, InvariantViolation::OutputMissing { .. }));
    }

    #[test]
    fn detects_unmarked_spent_coinbase() {
        let (chain, block) = committed();
        let id = chain.genesis().transactions[0].output_id(0).unwrap();
        chain
            .store()
            .put(&utxo_key(&id), &encode_utxo(&UtxoEntry::new(true, 0)).unwrap())
            .unwrap();
        let err = validate_execution(&**chain.store(), &block).unwrap_err();
        assert!(matches!(err, InvariantViolation::SpentEntryNotMarked { .. }));
    }

    #[test]
    fn detects_lingering_regular_entry() {
        let (chain, block) = committed();
        let id = chain.genesis().transactions[0].output_id(0).unwrap();
        chain
            .store()
            .put(&utxo_key(&id), &encode_utxo(&UtxoEntry::new(false, 0)).unwrap())
            .unwrap();
        let err = validate_execution(&**chain.store(), &block).unwrap_err();
        assert!(matches!(err, InvariantViolation::SpentEntryNotCoinbase { .. }));
    }
}
