//! Integration tests for the reference chain: commit, ledger bookkeeping,
//! side branches and reorganization.

use std::sync::Arc;

use oracle_ledger::{Assembler, Block, BlockAssembler, Chain, ChainEngine, LedgerError};
use oracle_nullables::NullStore;
use oracle_store::{get_utxo, iter_utxos};
use oracle_transactions::{always_true, SpendInput, Transaction, TxBuilder, TxInput, TxOutput};
use oracle_types::{Amount, AssetId, ChainParams, UtxoEntry};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup() -> (Chain<NullStore>, Assembler) {
    let params = ChainParams::dev();
    let chain = Chain::new(Arc::new(NullStore::new()), params.clone()).expect("chain");
    (chain, Assembler::new(params))
}

fn spend(src: &Transaction, position: usize, amounts: &[u64]) -> Transaction {
    let mut builder = TxBuilder::new();
    builder.add_input(TxInput::Spend(SpendInput::from_output(src, position).unwrap()));
    for amount in amounts {
        builder.add_output(TxOutput::new(
            AssetId::NATIVE,
            Amount::new(*amount),
            always_true(),
        ));
    }
    builder.build().unwrap()
}

fn mine(chain: &mut Chain<NullStore>, assembler: &Assembler, txs: Vec<Transaction>) -> Block {
    let mut block = assembler.new_block(&*chain, txs, &always_true()).unwrap();
    assembler.solve(&mut block).unwrap();
    chain.process_block(block.clone()).unwrap();
    block
}

fn empty_child(assembler: &Assembler, parent: &Block, salt: u64) -> Block {
    let mut block = assembler.empty_block(
        parent.height() + 1,
        parent.timestamp().plus_secs(150 + salt),
        parent.hash(),
        parent.bits(),
    );
    assembler.solve(&mut block).unwrap();
    block
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

#[test]
fn genesis_coinbase_is_spendable() {
    let (chain, _) = setup();
    let genesis = chain.genesis().clone();
    let entry = get_utxo(&**chain.store(), &genesis.transactions[0].output_id(0).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(entry, UtxoEntry::new(true, 0));
    assert_eq!(chain.height(), 0);
}

#[test]
fn committed_block_becomes_tip_with_matching_status() {
    let (mut chain, assembler) = setup();
    let genesis = chain.genesis().clone();
    let tx = spend(&genesis.transactions[0], 0, &[10, 20]);
    let block = mine(&mut chain, &assembler, vec![tx.clone()]);

    assert_eq!(chain.best_block().hash(), block.hash());
    assert!(chain.in_main_chain(1, &block.hash()));
    assert_eq!(chain.block_by_height(1).unwrap().hash(), block.hash());
    let status = chain.transaction_status(&block.hash()).unwrap();
    assert_eq!(status.root(), block.transaction_status_hash());

    for id in tx.result_ids() {
        assert_eq!(
            get_utxo(&**chain.store(), &id).unwrap(),
            Some(UtxoEntry::new(false, 1))
        );
    }
}

#[test]
fn double_spend_across_blocks_is_rejected_and_ledger_untouched() {
    let (mut chain, assembler) = setup();
    let genesis = chain.genesis().clone();
    mine(&mut chain, &assembler, vec![spend(&genesis.transactions[0], 0, &[5])]);
    let before = iter_utxos(&**chain.store()).unwrap();

    let mut block = assembler
        .new_block(&chain, vec![spend(&genesis.transactions[0], 0, &[6])], &always_true())
        .unwrap();
    assembler.solve(&mut block).unwrap();
    let err = chain.process_block(block).unwrap_err();

    assert!(matches!(err, LedgerError::AlreadySpent { .. }));
    assert_eq!(iter_utxos(&**chain.store()).unwrap(), before);
    assert_eq!(chain.height(), 1);
}

#[test]
fn unknown_parent_is_rejected() {
    let (mut chain, assembler) = setup();
    let orphan = assembler.empty_block(
        5,
        chain.genesis().timestamp().plus_secs(1),
        oracle_types::BlockHash::new([9u8; 32]),
        chain.genesis().bits(),
    );
    assert!(matches!(
        chain.process_block(orphan),
        Err(LedgerError::UnknownParent { .. })
    ));
}

#[test]
fn insufficient_work_is_rejected() {
    let params = ChainParams::default();
    let mut chain = Chain::new(Arc::new(NullStore::new()), params.clone()).unwrap();
    let assembler = Assembler::new(params);
    let mut block = assembler.new_block(&chain, Vec::new(), &always_true()).unwrap();
    assembler.solve(&mut block).unwrap();
    // pick a nonce that fails the target
    let hash = block.hash();
    let bad = (0..u64::MAX)
        .find(|n| !oracle_work::validate_work(&hash, *n, block.bits()))
        .unwrap();
    block.header.nonce = bad;
    assert!(matches!(
        chain.process_block(block),
        Err(LedgerError::InvalidWork { .. })
    ));
}

// ---------------------------------------------------------------------------
// Reorganization
// ---------------------------------------------------------------------------

#[test]
fn reorganize_to_ancestor_restores_ledger() {
    let (mut chain, assembler) = setup();
    let genesis = chain.genesis().clone();
    let tx1 = spend(&genesis.transactions[0], 0, &[10, 20]);
    let b1 = mine(&mut chain, &assembler, vec![tx1.clone()]);
    let snapshot = iter_utxos(&**chain.store()).unwrap();

    let tx2 = spend(&tx1, 0, &[9]);
    mine(&mut chain, &assembler, vec![tx2]);
    mine(&mut chain, &assembler, Vec::new());
    assert_eq!(chain.height(), 3);

    chain.reorganize_to(&b1).unwrap();

    assert_eq!(chain.height(), 1);
    assert_eq!(chain.best_block().hash(), b1.hash());
    assert!(chain.in_main_chain(1, &b1.hash()));
    assert_eq!(iter_utxos(&**chain.store()).unwrap(), snapshot);
}

#[test]
fn reorganize_to_tip_is_noop() {
    let (mut chain, assembler) = setup();
    let b1 = mine(&mut chain, &assembler, Vec::new());
    let before = iter_utxos(&**chain.store()).unwrap();
    chain.reorganize_to(&b1).unwrap();
    assert_eq!(iter_utxos(&**chain.store()).unwrap(), before);
    assert_eq!(chain.best_block().hash(), b1.hash());
}

#[test]
fn longer_side_branch_takes_over() {
    let (mut chain, assembler) = setup();
    let genesis = chain.genesis().clone();
    let main1 = mine(&mut chain, &assembler, Vec::new());

    let side1 = empty_child(&assembler, &genesis, 7);
    chain.process_block(side1.clone()).unwrap();
    assert_eq!(chain.best_block().hash(), main1.hash());

    let side2 = empty_child(&assembler, &side1, 0);
    chain.process_block(side2.clone()).unwrap();

    assert_eq!(chain.best_block().hash(), side2.hash());
    assert!(chain.in_main_chain(1, &side1.hash()));
    assert!(!chain.in_main_chain(1, &main1.hash()));
    assert_eq!(chain.height(), 2);
    assert_eq!(
        get_utxo(&**chain.store(), &side2.transactions[0].output_id(0).unwrap()).unwrap(),
        Some(UtxoEntry::new(true, 2))
    );

    // and back again
    chain.reorganize_to(&main1).unwrap();
    assert_eq!(chain.best_block().hash(), main1.hash());
    assert_eq!(chain.height(), 1);
}

#[test]
fn reorganize_to_unknown_block_fails() {
    let (mut chain, assembler) = setup();
    let stranger = empty_child(&assembler, &chain.genesis().clone(), 3);
    assert!(matches!(
        chain.reorganize_to(&stranger),
        Err(LedgerError::UnknownBlock { .. })
    ));
}
