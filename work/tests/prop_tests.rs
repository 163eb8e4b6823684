use proptest::prelude::*;

use oracle_types::BlockHash;
use oracle_work::{validate_work, work_value, WorkError, WorkGenerator};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Generated PoW always passes its own validation.
    #[test]
    fn generated_pow_always_valid(
        hash_bytes in prop::array::uniform32(0u8..),
        difficulty in 0u64..=0xF000_0000_0000_0000,
    ) {
        let block_hash = BlockHash::new(hash_bytes);
        let nonce = WorkGenerator::default().generate(&block_hash, difficulty).unwrap();
        prop_assert!(
            validate_work(&block_hash, nonce.0, difficulty),
            "generated nonce must pass validation"
        );
    }

    /// The generator returns the smallest qualifying nonce.
    #[test]
    fn generated_nonce_is_minimal(
        hash_bytes in prop::array::uniform32(0u8..),
        difficulty in 0xC000_0000_0000_0000u64..=0xF000_0000_0000_0000,
    ) {
        let block_hash = BlockHash::new(hash_bytes);
        let nonce = WorkGenerator::default().generate(&block_hash, difficulty).unwrap();
        for lower in 0..nonce.0 {
            prop_assert!(work_value(&block_hash, lower) < difficulty);
        }
    }
}

#[test]
fn exhausted_search_reports_its_bounds() {
    let block_hash = BlockHash::new([3u8; 32]);
    let generator = WorkGenerator::with_max_attempts(16);
    // Reaching u64::MAX in 16 attempts is not a realistic outcome.
    match generator.generate(&block_hash, u64::MAX) {
        Err(WorkError::Exhausted {
            attempts,
            difficulty,
        }) => {
            assert_eq!(attempts, 16);
            assert_eq!(difficulty, u64::MAX);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn zero_difficulty_short_circuits() {
    let nonce = WorkGenerator::with_max_attempts(0)
        .generate(&BlockHash::new([9u8; 32]), 0)
        .unwrap();
    assert_eq!(nonce.0, 0);
}
