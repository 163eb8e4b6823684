#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed bytes must decode to an error, never a panic.
    if let Ok(block) = bincode::deserialize::<oracle_ledger::Block>(data) {
        let _ = block.hash();
        let _ = oracle_ledger::block::transactions_root(&block.transactions);
    }

    if let Ok(tx) = bincode::deserialize::<oracle_transactions::Transaction>(data) {
        let _ = tx.compute_hash();
        let _ = oracle_transactions::validate_structure(&tx);
    }

    // Ledger values as stored under the UT: prefix.
    let _ = oracle_store::decode_utxo(data);
});
