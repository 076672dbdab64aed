//! Merkle tree construction over leaf hashes.
//!
//! Each level with more than one node is padded to even length with
//! [`EMPTY_HASH`] (never by duplicating the last node), then folded pairwise
//! with [`hash_pair`]. A single leaf is its own root.
//!
//! [`MerkleTree`] keeps every padded level so that all proofs can be read off
//! in O(n log n) total. [`compute_root`] folds in place when only the root is
//! wanted.

use crate::error::{NotFoundError, ValidationError};
use crate::hash::{hash_pair, EMPTY_HASH, H256};
use crate::leaf::encode_leaves;
use crate::proof::Proof;
use crate::record::Record;

/// A built tree with all levels retained.
///
/// `levels[0]` holds the leaves in input order; every level except the last
/// has even length (one [`EMPTY_HASH`] appended where needed). The last level
/// is the root alone. Levels are never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<H256>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build from leaf hashes in input order.
    pub fn from_leaves(leaves: Vec<H256>) -> Result<Self, ValidationError> {
        if leaves.is_empty() {
            return Err(ValidationError::EmptyRecordSet);
        }
        let leaf_count = leaves.len();
        let mut levels = Vec::with_capacity(tree_height(leaf_count) + 1);
        let mut current = leaves;
        while current.len() > 1 {
            pad(&mut current);
            let parents = fold(&current);
            levels.push(current);
            current = parents;
        }
        levels.push(current);

        let tree = Self { levels, leaf_count };
        tracing::debug!(
            leaves = leaf_count,
            height = tree.height(),
            root = %tree.root(),
            "built merkle tree"
        );
        Ok(tree)
    }

    /// Encode `records` and build.
    pub fn from_records(records: &[Record]) -> Result<Self, ValidationError> {
        Self::from_leaves(encode_leaves(records))
    }

    pub fn root(&self) -> H256 {
        // `from_leaves` always pushes a final single-node level.
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of real (unpadded) leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of folds from the leaves to the root, which is also the length
    /// of every proof.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    /// All retained levels, leaves first.
    pub fn levels(&self) -> &[Vec<H256>] {
        &self.levels
    }

    pub fn leaf(&self, index: usize) -> Option<H256> {
        if index < self.leaf_count {
            Some(self.levels[0][index])
        } else {
            None
        }
    }

    /// Sibling path for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<Proof, NotFoundError> {
        if index >= self.leaf_count {
            return Err(NotFoundError::Position {
                index,
                len: self.leaf_count,
            });
        }
        Ok(self.sibling_path(index))
    }

    /// Proof for the first leaf equal to `record`'s leaf.
    pub fn proof_for_record(&self, record: &Record) -> Result<Proof, NotFoundError> {
        let leaf = record.leaf();
        self.levels[0][..self.leaf_count]
            .iter()
            .position(|node| *node == leaf)
            .map(|index| self.sibling_path(index))
            .ok_or(NotFoundError::Owner {
                owner: record.owner,
            })
    }

    /// Proofs for every leaf, in input order.
    pub fn proofs(&self) -> Vec<Proof> {
        (0..self.leaf_count).map(|i| self.sibling_path(i)).collect()
    }

    /// Same result as [`MerkleTree::proofs`], extracted on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn par_proofs(&self) -> Vec<Proof> {
        use rayon::prelude::*;

        (0..self.leaf_count)
            .into_par_iter()
            .map(|i| self.sibling_path(i))
            .collect()
    }

    fn sibling_path(&self, index: usize) -> Proof {
        let mut node = index;
        Proof::new(
            self.levels[..self.height()]
                .iter()
                .map(|level| {
                    let sibling = level[node ^ 1];
                    node /= 2;
                    sibling
                })
                .collect(),
        )
    }
}

/// Root of `leaves` without retaining intermediate levels.
///
/// Returns `None` for an empty input.
pub fn compute_root(mut leaves: Vec<H256>) -> Option<H256> {
    while leaves.len() > 1 {
        pad(&mut leaves);
        let mut write = 0;
        for read in (0..leaves.len()).step_by(2) {
            leaves[write] = hash_pair(&leaves[read], &leaves[read + 1]);
            write += 1;
        }
        leaves.truncate(write);
    }
    leaves.first().copied()
}

/// Proof length for `n` leaves: `ceil(log2(n))`, zero for `n <= 1`.
pub fn tree_height(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

fn pad(level: &mut Vec<H256>) {
    if level.len() % 2 == 1 {
        level.push(EMPTY_HASH);
    }
}

fn fold(level: &[H256]) -> Vec<H256> {
    level
        .chunks_exact(2)
        .map(|pair| hash_pair(&pair[0], &pair[1]))
        .collect()
}
