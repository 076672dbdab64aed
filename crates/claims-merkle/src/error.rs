//! Error taxonomy for commitment generation.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::Address;

/// Malformed input, detected before any hashing begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid address {value:?}: {reason}")]
    Address { value: String, reason: &'static str },
    #[error("invalid weight {value:?}: {reason}")]
    Weight { value: String, reason: &'static str },
    #[error("weight {value} overflows 128 bits after scaling")]
    WeightOverflow { value: u128 },
    #[error("expected `address` or `address,weight`, got {fields} fields")]
    TooManyFields { fields: usize },
    #[error("duplicate owner {owner} (first seen on line {first_line})")]
    DuplicateOwner { owner: Address, first_line: usize },
    #[error("record set is empty")]
    EmptyRecordSet,
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Attach a 1-based input line number.
    pub fn at_line(self, line: usize) -> Self {
        Self::Line {
            line,
            source: Box::new(self),
        }
    }
}

/// A proof was requested for something outside the active record set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("position {index} is out of range for {len} records")]
    Position { index: usize, len: usize },
    #[error("owner {owner} is not in the record set")]
    Owner { owner: Address },
}

/// A freshly extracted proof failed to verify against its own root.
///
/// This never comes from bad input; it means the builder, extractor and
/// verifier disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("internal consistency fault: proof for record {index} ({owner}) does not verify")]
pub struct ConsistencyFault {
    pub index: usize,
    pub owner: Address,
}

/// Crate-level error surfaced to pipeline callers.
#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Consistency(#[from] ConsistencyFault),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ClaimsError>;
