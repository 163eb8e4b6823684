//! Block proof-of-work.
//!
//! Work is bound to the block hash, which excludes the nonce, so solving a
//! block never changes its identity. A nonce is valid when the first eight
//! bytes of `Blake2b(block_hash || nonce)`, read little-endian, reach the
//! block's difficulty.

pub mod error;
pub mod generator;
pub mod validator;

pub use error::WorkError;
pub use generator::WorkGenerator;
pub use validator::{validate_work, work_value};

/// The result of PoW generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkNonce(pub u64);
