//! Genesis block creation.
//!
//! The genesis block has `previous: BlockHash::ZERO`, height 0, and a single
//! coinbase transaction paying the block reward to the always-true program.
//! It is deterministic for a given [`ChainParams`] and is never work-checked.

use oracle_transactions::{always_true, CoinbaseInput, Transaction, TxInput, TxOutput, TX_VERSION};
use oracle_types::{AssetId, BlockHash, ChainParams, Height, Timestamp};

use crate::block::{transactions_root, Block, BlockHeader, BLOCK_VERSION};
use crate::status::TransactionStatus;

/// Coinbase transaction for a block at `height`.
pub fn coinbase_transaction(
    params: &ChainParams,
    height: Height,
    reward_program: &[u8],
) -> Transaction {
    Transaction::new(
        TX_VERSION,
        vec![TxInput::Coinbase(CoinbaseInput::for_height(height))],
        vec![TxOutput::new(
            AssetId::NATIVE,
            params.coinbase_reward,
            reward_program.to_vec(),
        )],
    )
}

/// Create the genesis block for `params`.
pub fn create_genesis_block(params: &ChainParams) -> Block {
    let transactions = vec![coinbase_transaction(params, 0, &always_true())];
    let header = BlockHeader {
        version: BLOCK_VERSION,
        height: 0,
        previous: BlockHash::ZERO,
        timestamp: Timestamp::new(params.genesis_timestamp),
        bits: params.genesis_bits,
        nonce: 0,
        transactions_root: transactions_root(&transactions),
        transaction_status_hash: TransactionStatus::all_success(transactions.len()).root(),
    };
    Block {
        header,
        transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_deterministic() {
        let params = ChainParams::default();
        assert_eq!(
            create_genesis_block(&params).hash(),
            create_genesis_block(&params).hash()
        );
    }

    #[test]
    fn genesis_depends_on_params() {
        let a = create_genesis_block(&ChainParams::default());
        let b = create_genesis_block(&ChainParams::dev());
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn genesis_has_one_coinbase() {
        let g = create_genesis_block(&ChainParams::default());
        assert_eq!(g.height(), 0);
        assert_eq!(g.transactions.len(), 1);
        assert!(g.transactions[0].is_coinbase());
    }
}
