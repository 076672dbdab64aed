//! Keccak-256 primitives shared by leaves, tree nodes and proofs.
//!
//! Every hash here is taken over the tight concatenation of its inputs
//! (Solidity `abi.encodePacked`), so an on-chain verifier computing
//! `keccak256(abi.encodePacked(...))` reproduces the same bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

/// Hash of the zero-length input, used to pad odd tree levels.
pub const EMPTY_HASH: H256 = H256([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c,
    0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b,
    0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// A 32-byte tree node.
///
/// Ordering is lexicographic over the bytes, which is the same as comparing
/// the values as big-endian 256-bit integers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct H256(pub [u8; 32]);

impl H256 {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Copy of this node with one bit inverted. Bit 0 is the most significant
    /// bit of the first byte.
    pub fn with_flipped_bit(mut self, bit: usize) -> Self {
        self.0[(bit / 8) % 32] ^= 0x80 >> (bit % 8);
        self
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self)
    }
}

/// Error returned when a string is not a 32-byte hex value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 32-byte hex hash, got {0:?}")]
pub struct ParseHashError(pub String);

impl FromStr for H256 {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut out = [0u8; 32];
        hex::decode_to_slice(digits, &mut out).map_err(|_| ParseHashError(s.to_string()))?;
        Ok(Self(out))
    }
}

impl Serialize for H256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256(hasher.finalize().into())
}

/// Sorted-pair parent hash: `keccak256(min(a, b) || max(a, b))`.
///
/// The result depends only on the set `{a, b}`, so proofs need not record
/// which side a sibling was on.
pub fn hash_pair(a: &H256, b: &H256) -> H256 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut packed = [0u8; 64];
    packed[..32].copy_from_slice(&low.0);
    packed[32..].copy_from_slice(&high.0);
    keccak256(&packed)
}
