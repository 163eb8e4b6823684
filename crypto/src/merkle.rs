//! Binary Merkle tree over 32-byte leaves.
//!
//! Leaves and interior nodes are domain-separated. An odd node at any level is
//! promoted unchanged. The root of an empty list is all zeroes.

use crate::hash::blake2b_256_multi;

const LEAF_PREFIX: &[u8] = &[0x00];
const NODE_PREFIX: &[u8] = &[0x01];

/// Compute the Merkle root of already-hashed leaf payloads.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut level: Vec<[u8; 32]> = leaves
        .iter()
        .map(|leaf| blake2b_256_multi(&[LEAF_PREFIX, leaf]))
        .collect();

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => blake2b_256_multi(&[NODE_PREFIX, left, right]),
                [single] => *single,
                _ => unreachable!("chunks(2) yields one or two items"),
            })
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_root_is_zero() {
        assert_eq!(merkle_root(&[]), [0u8; 32]);
    }

    #[test]
    fn single_leaf_is_not_identity() {
        let leaf = [9u8; 32];
        assert_ne!(merkle_root(&[leaf]), leaf);
    }

    #[test]
    fn order_matters() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_ne!(merkle_root(&[a, b]), merkle_root(&[b, a]));
    }

    #[test]
    fn odd_leaf_count_is_stable() {
        let leaves = [[1u8; 32], [2u8; 32], [3u8; 32]];
        assert_eq!(merkle_root(&leaves), merkle_root(&leaves));
        assert_ne!(merkle_root(&leaves), merkle_root(&leaves[..2]));
    }
}
