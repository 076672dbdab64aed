//! Merkle proofs and their verification.

use serde::{Deserialize, Serialize};

use crate::hash::{hash_pair, H256};
use crate::record::Record;

/// Sibling hashes from leaf to root.
///
/// Carries no left/right flags: sorted-pair hashing makes position
/// irrelevant, which is also how the on-chain verifier consumes it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(Vec<H256>);

impl Proof {
    pub fn new(siblings: Vec<H256>) -> Self {
        Self(siblings)
    }

    pub fn siblings(&self) -> &[H256] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<H256> {
        self.0
    }

    /// Fold `leaf` through the siblings.
    pub fn compute_root(&self, leaf: H256) -> H256 {
        compute_root_from_path(leaf, &self.0)
    }

    pub fn verify(&self, leaf: H256, root: H256) -> bool {
        self.compute_root(leaf) == root
    }
}

impl From<Vec<H256>> for Proof {
    fn from(siblings: Vec<H256>) -> Self {
        Self(siblings)
    }
}

/// Root reached by folding `leaf` through `siblings` with sorted-pair hashing.
pub fn compute_root_from_path(leaf: H256, siblings: &[H256]) -> H256 {
    siblings
        .iter()
        .fold(leaf, |node, sibling| hash_pair(&node, sibling))
}

/// Check that `leaf` with `proof` reconstructs `root`.
pub fn verify(leaf: H256, proof: &[H256], root: H256) -> bool {
    compute_root_from_path(leaf, proof) == root
}

/// Check a record's membership (and weight) against `root`.
pub fn verify_record(record: &Record, proof: &Proof, root: H256) -> bool {
    proof.verify(record.leaf(), root)
}
