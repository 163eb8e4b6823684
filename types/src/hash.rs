//! Content hashes for transactions and their outputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifier of a single transaction output.
///
/// Derived from the producing transaction, the output position and the output
/// contents, so it is stable across reorganizations.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputId([u8; 32]);

impl OutputId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Rebuild an id from a raw slice (e.g. the tail of a storage key).
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_shows_short_prefix() {
        let h = TxHash::new([0xab; 32]);
        assert_eq!(format!("{:?}", h), "TxHash(abababab)");
    }

    #[test]
    fn display_shows_full_hex() {
        let id = OutputId::new([0x01; 32]);
        assert_eq!(id.to_string().len(), 64);
        assert!(id.to_string().chars().all(|c| c == '0' || c == '1'));
    }

    #[test]
    fn output_id_from_slice_requires_32_bytes() {
        assert!(OutputId::from_slice(&[0u8; 31]).is_none());
        assert_eq!(
            OutputId::from_slice(&[7u8; 32]),
            Some(OutputId::new([7u8; 32]))
        );
    }
}
