#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 32 bytes of header hash, 8 of nonce, optionally 8 of difficulty.
    if data.len() < 40 {
        return;
    }
    let mut hash_bytes = [0u8; 32];
    hash_bytes.copy_from_slice(&data[..32]);
    let mut nonce_bytes = [0u8; 8];
    nonce_bytes.copy_from_slice(&data[32..40]);
    let nonce = u64::from_le_bytes(nonce_bytes);
    let block_hash = oracle_types::BlockHash::new(hash_bytes);

    let difficulty = match data.get(40..48) {
        Some(bytes) => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            u64::from_le_bytes(buf)
        }
        None => oracle_types::ChainParams::default().genesis_bits,
    };

    let value = oracle_work::work_value(&block_hash, nonce);
    assert_eq!(
        oracle_work::validate_work(&block_hash, nonce, difficulty),
        value >= difficulty
    );
});
