use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown parent block {previous}")]
    UnknownParent { previous: String },

    #[error("unknown block {hash}")]
    UnknownBlock { hash: String },

    #[error("no main-chain block at height {height}")]
    BlockNotFound { height: u64 },

    #[error("no transaction status recorded for block {hash}")]
    StatusNotFound { hash: String },

    #[error("invalid block: {reason}")]
    InvalidBlock { reason: String },

    #[error("block {hash} does not meet difficulty {bits:#018x}")]
    InvalidWork { hash: String, bits: u64 },

    #[error("output {output_id} does not exist in the ledger")]
    MissingUtxo { output_id: String },

    #[error("output {output_id} is already spent")]
    AlreadySpent { output_id: String },

    #[error("output {output_id} is locked by a program that does not evaluate to true")]
    Unspendable { output_id: String },

    #[error("output {output_id} already exists in the ledger")]
    DuplicateOutput { output_id: String },

    #[error("transaction error: {0}")]
    Transaction(#[from] oracle_transactions::TransactionError),

    #[error("work error: {0}")]
    Work(#[from] oracle_work::WorkError),

    #[error("storage error: {0}")]
    Storage(#[from] oracle_store::StoreError),
}

impl LedgerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LedgerError::InvalidBlock {
            reason: reason.into(),
        }
    }
}
