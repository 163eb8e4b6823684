//! Abstract storage traits for the reorg oracle.
//!
//! Every storage backend (LMDB, in-memory for testing) implements [`KvStore`].
//! The chain engine writes its ledger through it and the scenario harness reads
//! the ledger back through it; neither depends on a concrete backend.

pub mod error;
pub mod kv;
pub mod utxo;

pub use error::StoreError;
pub use kv::{KvStore, WriteOp};
pub use utxo::{decode_utxo, encode_utxo, get_utxo, iter_utxos, utxo_key, UTXO_PREFIX};
