//! Merkle commitments over claim lists.
//!
//! This crate provides:
//! - `encode_leaf`: Keccak-256 leaf for an (address, optional uint128 weight) record
//! - `MerkleTree`: sorted-pair tree with empty-hash padding and retained levels
//! - `Proof` / `verify`: sibling paths and their verification
//! - `CommitmentPipeline`: parse, build, extract and self-verify every proof
//!
//! Hashing and packing match `keccak256(abi.encodePacked(...))`, so proofs
//! produced here are accepted by a Solidity verifier using the same rules.

pub mod artifact;
pub mod error;
pub mod hash;
pub mod input;
pub mod leaf;
pub mod pipeline;
pub mod proof;
pub mod record;
pub mod tree;

pub use artifact::{ClaimProof, Commitment};
pub use error::{ClaimsError, ConsistencyFault, NotFoundError, Result, ValidationError};
pub use hash::{hash_pair, keccak256, EMPTY_HASH, H256};
pub use input::{parse_records, DuplicatePolicy};
pub use leaf::{encode_leaf, encode_leaves};
pub use pipeline::{load_commitment, write_commitment, CommitmentPipeline, PipelineConfig};
pub use proof::{compute_root_from_path, verify, verify_record, Proof};
pub use record::{Address, Record, ScalePolicy, Weight};
pub use tree::{compute_root, tree_height, MerkleTree};
