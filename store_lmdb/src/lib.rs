//! LMDB storage backend for the reorg oracle.
//!
//! Implements [`oracle_store::KvStore`] using the `heed` LMDB bindings. A single
//! environment holds one named database; namespaces are key prefixes.

pub mod environment;
pub mod error;
pub mod kv;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use kv::LmdbKvStore;
