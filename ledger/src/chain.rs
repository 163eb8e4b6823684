//! The reference chain.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use oracle_store::KvStore;
use oracle_transactions::validate_structure;
use oracle_types::{BlockHash, ChainParams, Height};
use oracle_work::validate_work;

use crate::block::{transactions_root, Block, BLOCK_VERSION};
use crate::engine::ChainEngine;
use crate::genesis::create_genesis_block;
use crate::status::TransactionStatus;
use crate::utxo_view::{UndoLog, UtxoView};
use crate::LedgerError;

/// A UTXO chain whose ledger lives in `S`.
///
/// Block bodies, the main-chain index, statuses and undo logs are held in
/// memory; only the ledger goes through the store, which is what external
/// observers inspect.
pub struct Chain<S: KvStore + ?Sized> {
    store: Arc<S>,
    params: ChainParams,
    genesis: Block,
    /// Every valid block seen, main chain and side branches alike.
    blocks: HashMap<BlockHash, Block>,
    /// Main-chain hashes indexed by height.
    main_chain: Vec<BlockHash>,
    statuses: HashMap<BlockHash, TransactionStatus>,
    /// Undo logs of currently connected blocks.
    undo_logs: HashMap<BlockHash, UndoLog>,
}

impl<S: KvStore + ?Sized> Chain<S> {
    /// Create a chain on an empty store and connect the genesis block.
    pub fn new(store: Arc<S>, params: ChainParams) -> Result<Self, LedgerError> {
        let genesis = create_genesis_block(&params);
        let mut chain = Self {
            store,
            params,
            genesis: genesis.clone(),
            blocks: HashMap::new(),
            main_chain: Vec::new(),
            statuses: HashMap::new(),
            undo_logs: HashMap::new(),
        };
        chain.connect_block(&genesis)?;
        chain.blocks.insert(genesis.hash(), genesis);
        tracing::debug!(genesis = %chain.genesis.hash(), "chain initialised");
        Ok(chain)
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn genesis(&self) -> &Block {
        &self.genesis
    }

    /// Any known block, on or off the main chain.
    pub fn block(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.get(hash)
    }

    fn best_hash(&self) -> BlockHash {
        self.main_chain
            .last()
            .copied()
            .unwrap_or_else(|| self.genesis.hash())
    }

    /// Context-free and parent-relative checks. Ledger checks happen on connect.
    fn validate_block(&self, block: &Block, parent: &Block) -> Result<(), LedgerError> {
        let header = &block.header;
        if header.version != BLOCK_VERSION {
            return Err(LedgerError::invalid(format!(
                "unsupported version {}",
                header.version
            )));
        }
        if header.height != parent.height() + 1 {
            return Err(LedgerError::invalid(format!(
                "height {} does not follow parent height {}",
                header.height,
                parent.height()
            )));
        }
        if header.timestamp <= parent.timestamp() {
            return Err(LedgerError::invalid(format!(
                "timestamp {} not after parent timestamp {}",
                header.timestamp,
                parent.timestamp()
            )));
        }
        if header.bits != parent.bits() {
            return Err(LedgerError::invalid(format!(
                "bits {:#x} differ from parent bits {:#x}",
                header.bits,
                parent.bits()
            )));
        }
        let hash = block.hash();
        if !validate_work(&hash, header.nonce, header.bits) {
            return Err(LedgerError::InvalidWork {
                hash: hash.to_string(),
                bits: header.bits,
            });
        }

        match block.transactions.first() {
            Some(first) if first.is_coinbase() => {}
            _ => return Err(LedgerError::invalid("first transaction is not a coinbase")),
        }
        if block.transactions.iter().skip(1).any(|tx| tx.is_coinbase()) {
            return Err(LedgerError::invalid("more than one coinbase transaction"));
        }
        if transactions_root(&block.transactions) != header.transactions_root {
            return Err(LedgerError::invalid("transactions root mismatch"));
        }

        let mut seen = HashSet::new();
        for tx in &block.transactions {
            validate_structure(tx)?;
            if !seen.insert(tx.hash) {
                return Err(LedgerError::invalid(format!("duplicate transaction {}", tx.hash)));
            }
        }
        Ok(())
    }

    /// Apply `block` on top of the current tip.
    fn connect_block(&mut self, block: &Block) -> Result<(), LedgerError> {
        let height = block.height();
        let mut view = UtxoView::new(&*self.store);
        for tx in &block.transactions {
            view.apply_transaction(tx, height)?;
        }

        let status = TransactionStatus::all_success(block.transactions.len());
        if status.root() != block.transaction_status_hash() {
            return Err(LedgerError::invalid("transaction status hash mismatch"));
        }

        let (ops, undo) = view.into_write_set()?;
        self.store.write_batch(&ops)?;

        let hash = block.hash();
        tracing::debug!(height, %hash, writes = ops.len(), "connected block");
        self.statuses.insert(hash, status);
        self.undo_logs.insert(hash, undo);
        self.main_chain.push(hash);
        Ok(())
    }

    /// Rewind the ledger by the current tip and drop it from the main chain.
    fn disconnect_tip(&mut self) -> Result<BlockHash, LedgerError> {
        let hash = self.best_hash();
        if self.main_chain.len() <= 1 {
            return Err(LedgerError::invalid("cannot disconnect the genesis block"));
        }
        let undo = self
            .undo_logs
            .get(&hash)
            .ok_or_else(|| LedgerError::invalid(format!("no undo log for block {hash}")))?;
        self.store.write_batch(&undo.restore_ops()?)?;
        self.undo_logs.remove(&hash);
        self.main_chain.pop();
        tracing::debug!(height = self.main_chain.len(), %hash, "disconnected block");
        Ok(hash)
    }

    /// Blocks from the main chain (exclusive) up to `target` (inclusive), oldest first.
    fn branch_to(&self, target: &BlockHash) -> Result<(Height, Vec<BlockHash>), LedgerError> {
        let mut branch = Vec::new();
        let mut cursor = *target;
        loop {
            let block = self.blocks.get(&cursor).ok_or_else(|| LedgerError::UnknownBlock {
                hash: cursor.to_string(),
            })?;
            if self.in_main_chain(block.height(), &cursor) {
                branch.reverse();
                return Ok((block.height(), branch));
            }
            branch.push(cursor);
            cursor = block.previous();
        }
    }

    fn connect_known(&mut self, hash: &BlockHash) -> Result<(), LedgerError> {
        let block = self
            .blocks
            .get(hash)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownBlock {
                hash: hash.to_string(),
            })?;
        self.connect_block(&block)
    }

    fn reorganize_to_hash(&mut self, target: &BlockHash) -> Result<(), LedgerError> {
        let (fork_height, attach) = self.branch_to(target)?;

        let mut detached = Vec::new();
        while self.height() > fork_height {
            detached.push(self.disconnect_tip()?);
        }

        for (i, hash) in attach.iter().enumerate() {
            if let Err(err) = self.connect_known(hash) {
                tracing::warn!(%hash, error = %err, "branch block failed to connect, restoring previous main chain");
                for _ in 0..i {
                    self.disconnect_tip()?;
                }
                for old in detached.iter().rev() {
                    self.connect_known(old)?;
                }
                self.blocks.remove(hash);
                return Err(err);
            }
        }

        tracing::info!(
            fork_height,
            detached = detached.len(),
            attached = attach.len(),
            best = %self.best_hash(),
            "reorganized chain"
        );
        Ok(())
    }
}

impl<S: KvStore + ?Sized> ChainEngine for Chain<S> {
    fn best_block(&self) -> &Block {
        self.blocks.get(&self.best_hash()).unwrap_or(&self.genesis)
    }

    fn block_by_height(&self, height: Height) -> Result<&Block, LedgerError> {
        self.main_chain
            .get(height as usize)
            .and_then(|hash| self.blocks.get(hash))
            .ok_or(LedgerError::BlockNotFound { height })
    }

    fn in_main_chain(&self, height: Height, hash: &BlockHash) -> bool {
        self.main_chain.get(height as usize) == Some(hash)
    }

    fn transaction_status(&self, hash: &BlockHash) -> Result<&TransactionStatus, LedgerError> {
        self.statuses
            .get(hash)
            .ok_or_else(|| LedgerError::StatusNotFound {
                hash: hash.to_string(),
            })
    }

    fn process_block(&mut self, block: Block) -> Result<(), LedgerError> {
        let hash = block.hash();
        if self.blocks.contains_key(&hash) {
            tracing::debug!(%hash, "block already known");
            return Ok(());
        }

        let parent = self
            .blocks
            .get(&block.previous())
            .ok_or_else(|| LedgerError::UnknownParent {
                previous: block.previous().to_string(),
            })?;
        self.validate_block(&block, parent)?;

        if block.previous() == self.best_hash() {
            self.connect_block(&block)?;
            self.blocks.insert(hash, block);
            return Ok(());
        }

        let height = block.height();
        self.blocks.insert(hash, block);
        if height > self.height() {
            self.reorganize_to_hash(&hash)?;
        } else {
            tracing::debug!(height, %hash, "stored side-branch block");
        }
        Ok(())
    }

    fn reorganize_to(&mut self, block: &Block) -> Result<(), LedgerError> {
        let hash = block.hash();
        if !self.blocks.contains_key(&hash) {
            return Err(LedgerError::UnknownBlock {
                hash: hash.to_string(),
            });
        }
        if hash == self.best_hash() {
            return Ok(());
        }
        self.reorganize_to_hash(&hash)
    }
}
