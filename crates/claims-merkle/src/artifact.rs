//! The published commitment: root plus every record with its proof.
//!
//! Entries form an ordered list rather than a map keyed by owner, so
//! duplicates cannot silently collapse and the on-disk order matches leaf
//! order.

use serde::{Deserialize, Serialize};

use crate::error::NotFoundError;
use crate::hash::H256;
use crate::proof::Proof;
use crate::record::{Address, Record, Weight};
use crate::tree::MerkleTree;

/// One record restated alongside its proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimProof {
    pub owner: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    pub proof: Proof,
}

impl ClaimProof {
    pub fn new(record: Record, proof: Proof) -> Self {
        Self {
            owner: record.owner,
            weight: record.weight,
            proof,
        }
    }

    pub fn record(&self) -> Record {
        Record {
            owner: self.owner,
            weight: self.weight,
        }
    }

    pub fn verify(&self, root: H256) -> bool {
        self.proof.verify(self.record().leaf(), root)
    }
}

/// Root and per-record proofs, in input order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub root: H256,
    pub proofs: Vec<ClaimProof>,
}

impl Commitment {
    pub fn len(&self) -> usize {
        self.proofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proofs.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.proofs.iter().map(ClaimProof::record)
    }

    /// The entry for `owner`; the first one if duplicates were admitted.
    pub fn proof_for_owner(&self, owner: &Address) -> Result<&ClaimProof, NotFoundError> {
        self.proofs
            .iter()
            .find(|entry| &entry.owner == owner)
            .ok_or(NotFoundError::Owner { owner: *owner })
    }

    /// Index of the first entry whose proof does not reach `root`.
    pub fn first_invalid(&self) -> Option<usize> {
        self.proofs.iter().position(|entry| !entry.verify(self.root))
    }

    /// Rebuild the tree from the restated records and compare roots. Unlike
    /// per-entry checks this also catches added or removed entries and
    /// entries moved out of their pair.
    pub fn root_matches_records(&self) -> bool {
        let records: Vec<Record> = self.records().collect();
        MerkleTree::from_records(&records)
            .map(|tree| tree.root() == self.root)
            .unwrap_or(false)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<Vec<u8>> {
        if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        }
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
