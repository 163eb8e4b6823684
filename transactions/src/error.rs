use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction has no inputs")]
    EmptyInputs,

    #[error("transaction has no outputs")]
    EmptyOutputs,

    #[error("amount must be positive (output {index})")]
    ZeroAmount { index: usize },

    #[error("coinbase input must be the only input")]
    MisplacedCoinbase,

    #[error("output {output_id} is spent twice")]
    DuplicateSpend { output_id: String },

    #[error("output index {index} out of range for transaction {tx_hash} ({count} outputs)")]
    OutputIndexOutOfRange {
        tx_hash: String,
        index: usize,
        count: usize,
    },
}
