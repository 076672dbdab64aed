//! Leaf encoding.
//!
//! - weighted: `keccak256(abi.encodePacked(address owner, uint128 weight))`
//! - membership only: `keccak256(abi.encodePacked(address owner))`
//!
//! Packed encoding is 20 address bytes followed by the weight as 16
//! big-endian bytes. A verifier contract must use exactly this layout.

use crate::hash::{keccak256, H256};
use crate::record::Record;

/// Packed width of a weighted leaf preimage.
const WEIGHTED_PREIMAGE_LEN: usize = 20 + 16;

/// Hash one record into its leaf.
pub fn encode_leaf(record: &Record) -> H256 {
    match record.weight {
        Some(weight) => {
            let mut packed = [0u8; WEIGHTED_PREIMAGE_LEN];
            packed[..20].copy_from_slice(record.owner.as_bytes());
            packed[20..].copy_from_slice(&weight.get().to_be_bytes());
            keccak256(&packed)
        }
        None => keccak256(record.owner.as_bytes()),
    }
}

/// Leaves for a record sequence, in order.
pub fn encode_leaves(records: &[Record]) -> Vec<H256> {
    records.iter().map(encode_leaf).collect()
}

impl Record {
    pub fn leaf(&self) -> H256 {
        encode_leaf(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Address, ScalePolicy, Weight};

    const ADDR: &str = "0x14b0Ed2a7C4cC60DD8F676AE44D0831d3c9b2a9E";

    fn h(s: &str) -> H256 {
        s.parse().unwrap()
    }

    #[test]
    fn test_weighted_leaf_vector() {
        let record = Record::new(ADDR.parse().unwrap(), Weight(1_000_000_000_000_000_000));
        assert_eq!(
            record.leaf(),
            h("0x1f905a93c6a29e73db1980866c2e7d64bf111d351db99b56f16f4b26febffde6")
        );
    }

    #[test]
    fn test_membership_leaf_vector() {
        let record = Record::member(ADDR.parse().unwrap());
        assert_eq!(
            record.leaf(),
            h("0x8c42c1d90b752f376b7201a49ac9df704f70b4aa75bc44a0b15acfb66ba56003")
        );
    }

    #[test]
    fn test_scale_boundary_leaves() {
        let policy = ScalePolicy::default();
        let scaled = Record::parse(ADDR, Some("9999999999"), &policy).unwrap();
        let unscaled = Record::parse(ADDR, Some("10000000000"), &policy).unwrap();
        assert_eq!(
            scaled.leaf(),
            h("0xb3d323a8a47e0e1786f1b6bc8bee55633275e8a3575d2f12f6881ffade09537e")
        );
        assert_eq!(
            unscaled.leaf(),
            h("0x2110d9fb13169c9a0cb34d7c238448df851a16eafea95a50d640deabc5500106")
        );
    }

    #[test]
    fn test_zero_weight_differs_from_membership() {
        let owner: Address = ADDR.parse().unwrap();
        assert_ne!(
            Record::new(owner, Weight(0)).leaf(),
            Record::member(owner).leaf()
        );
    }

    #[test]
    fn test_encode_leaves_preserves_order() {
        let a = Record::member([0x11; 20].into());
        let b = Record::member([0x22; 20].into());
        assert_eq!(encode_leaves(&[a, b]), vec![a.leaf(), b.leaf()]);
    }
}
