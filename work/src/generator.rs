//! PoW generation (multi-threaded CPU).

use rayon::prelude::*;

use crate::validator::validate_work;
use crate::{WorkError, WorkNonce};
use oracle_types::BlockHash;

/// Nonces tried per rayon task.
const BATCH_SIZE: u64 = 4096;

/// Default cap on the nonce search space.
const DEFAULT_MAX_ATTEMPTS: u64 = 1 << 32;

/// Finds the lowest valid nonce for a block, spreading batches of the nonce
/// space across the rayon pool.
///
/// The search always returns the smallest qualifying nonce, so solving the
/// same block twice yields the same header.
#[derive(Clone, Debug)]
pub struct WorkGenerator {
    max_attempts: u64,
}

impl Default for WorkGenerator {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl WorkGenerator {
    pub fn with_max_attempts(max_attempts: u64) -> Self {
        Self { max_attempts }
    }

    /// Generate a work nonce that meets the minimum difficulty.
    pub fn generate(
        &self,
        block_hash: &BlockHash,
        min_difficulty: u64,
    ) -> Result<WorkNonce, WorkError> {
        if min_difficulty == 0 {
            return Ok(WorkNonce(0));
        }

        let batches = self.max_attempts.div_ceil(BATCH_SIZE);
        let limit = self.max_attempts;
        (0..batches)
            .into_par_iter()
            .find_map_first(|batch| {
                let start = batch * BATCH_SIZE;
                let end = start.saturating_add(BATCH_SIZE).min(limit);
                (start..end).find(|&nonce| validate_work(block_hash, nonce, min_difficulty))
            })
            .map(WorkNonce)
            .ok_or(WorkError::Exhausted {
                attempts: self.max_attempts,
                difficulty: min_difficulty,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::work_value;

    #[test]
    fn test_generate_work() {
        let block_hash = BlockHash::new([0x42; 32]);
        let min_difficulty = 0xF000_0000_0000_0000;

        let nonce = WorkGenerator::default()
            .generate(&block_hash, min_difficulty)
            .unwrap();

        assert!(validate_work(&block_hash, nonce.0, min_difficulty));
    }

    #[test]
    fn test_generate_returns_lowest_nonce() {
        let block_hash = BlockHash::new([0x17; 32]);
        let min_difficulty = 0xC000_0000_0000_0000;
        let nonce = WorkGenerator::default()
            .generate(&block_hash, min_difficulty)
            .unwrap();
        for earlier in 0..nonce.0 {
            assert!(work_value(&block_hash, earlier) < min_difficulty);
        }
    }

    #[test]
    fn test_zero_difficulty() {
        let nonce = WorkGenerator::default()
            .generate(&BlockHash::ZERO, 0)
            .unwrap();
        assert_eq!(nonce.0, 0);
    }

    #[test]
    fn test_impossible_difficulty_is_exhausted() {
        let generator = WorkGenerator::with_max_attempts(16);
        let result = generator.generate(&BlockHash::new([1u8; 32]), u64::MAX);
        // a work value of exactly u64::MAX within 16 nonces is not a realistic outcome
        assert!(matches!(result, Err(WorkError::Exhausted { attempts: 16, .. })));
    }
}
