//! LMDB implementation of KvStore.
//!
//! Every call runs in its own LMDB transaction; `write_batch` groups its
//! operations into one write transaction, which is aborted if any operation
//! fails.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use oracle_store::{KvStore, StoreError, WriteOp};

use crate::LmdbError;

pub struct LmdbKvStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Bytes, Bytes>,
}

impl KvStore for LmdbKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .db
            .get(&rtxn, key)
            .map_err(LmdbError::from)?
            .map(|v| v.to_vec());
        Ok(value)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self
            .db
            .prefix_iter(&rtxn, prefix)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(LmdbError::from)?;
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }

    fn write_batch(&self, ops: &[WriteOp]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    self.db
                        .put(&mut wtxn, key, value)
                        .map_err(LmdbError::from)?;
                }
                WriteOp::Delete { key } => {
                    self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
                }
            }
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
