//! Commitment pipeline: parse, build once, extract every proof, self-verify.
//!
//! A proof that fails to verify against the root it was just extracted from
//! aborts the whole run with [`ConsistencyFault`]; no record is ever skipped.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::artifact::{ClaimProof, Commitment};
use crate::error::{ClaimsError, ConsistencyFault, Result, ValidationError};
use crate::hash::H256;
use crate::input::{parse_records, DuplicatePolicy};
use crate::leaf::encode_leaves;
use crate::proof::Proof;
use crate::record::{Record, ScalePolicy};
use crate::tree::{compute_root, MerkleTree};

/// Emit a progress event every this many verified proofs.
const PROGRESS_INTERVAL: usize = 100;

/// Configuration for a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Weight unit conversion applied while parsing
    pub scale: ScalePolicy,
    /// Handling of repeated owners
    pub duplicates: DuplicatePolicy,
    /// Extract and verify proofs on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
    /// Pretty-print the JSON artifact
    pub pretty: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale: ScalePolicy::default(),
            duplicates: DuplicatePolicy::Reject,
            parallel: cfg!(feature = "parallel"),
            pretty: false,
        }
    }
}

impl PipelineConfig {
    /// Default scaling, duplicates rejected.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Weights are taken verbatim as fixed-point values.
    pub fn raw() -> Self {
        Self {
            scale: ScalePolicy::disabled(),
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Drives a full commitment run.
#[derive(Clone, Debug, Default)]
pub struct CommitmentPipeline {
    config: PipelineConfig,
}

impl CommitmentPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse a claim list with this pipeline's scale and duplicate policies.
    pub fn parse(&self, text: &str) -> std::result::Result<Vec<Record>, ValidationError> {
        parse_records(text, &self.config.scale, self.config.duplicates)
    }

    /// Build the tree over `records` and return the self-verified commitment.
    pub fn commit(&self, records: &[Record]) -> Result<Commitment> {
        tracing::info!(records = records.len(), "building merkle tree");
        let tree = MerkleTree::from_records(records)?;
        tracing::info!(root = %tree.root(), height = tree.height(), "merkle tree built");

        let proofs = self.extract(&tree);
        let commitment = self.assemble(records, tree.root(), proofs)?;
        tracing::info!(proofs = commitment.len(), "all proofs verified");
        Ok(commitment)
    }

    /// Parse and commit in one step.
    pub fn run_str(&self, text: &str) -> Result<Commitment> {
        let records = self.parse(text)?;
        self.commit(&records)
    }

    /// Read a claim list from `input`, commit, and write the JSON artifact to
    /// `output`.
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<Commitment> {
        tracing::info!(input = %input.display(), output = %output.display(), "generating proofs");
        let records = self.read_records(input)?;
        let commitment = self.commit(&records)?;
        write_commitment(output, &commitment, self.config.pretty)?;
        tracing::info!(output = %output.display(), "commitment written");
        Ok(commitment)
    }

    /// Root of the claim list at `input`, without retaining tree levels.
    pub fn root_file(&self, input: &Path) -> Result<H256> {
        let records = self.read_records(input)?;
        compute_root(encode_leaves(&records)).ok_or(ValidationError::EmptyRecordSet.into())
    }

    pub fn read_records(&self, input: &Path) -> Result<Vec<Record>> {
        let text = fs::read_to_string(input).map_err(|source| ClaimsError::Io {
            path: input.to_path_buf(),
            source,
        })?;
        Ok(self.parse(&text)?)
    }

    #[cfg(feature = "parallel")]
    fn extract(&self, tree: &MerkleTree) -> Vec<Proof> {
        if self.config.parallel {
            tree.par_proofs()
        } else {
            tree.proofs()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn extract(&self, tree: &MerkleTree) -> Vec<Proof> {
        tree.proofs()
    }

    /// Pair each record with its proof after checking it against `root`.
    fn assemble(
        &self,
        records: &[Record],
        root: H256,
        proofs: Vec<Proof>,
    ) -> std::result::Result<Commitment, ConsistencyFault> {
        let total = records.len();
        let verified = AtomicUsize::new(0);
        let check = |index: usize, record: &Record, proof: Proof| {
            if !proof.verify(record.leaf(), root) {
                tracing::error!(index, owner = %record.owner, "self-verification failed");
                return Err(ConsistencyFault {
                    index,
                    owner: record.owner,
                });
            }
            let done = verified.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 {
                tracing::debug!("{}/{}", done, total);
            }
            Ok(ClaimProof::new(*record, proof))
        };

        if proofs.len() != total {
            // Only reachable if the extractor dropped a leaf.
            let index = proofs.len().min(total.saturating_sub(1));
            return Err(ConsistencyFault {
                index,
                owner: records[index].owner,
            });
        }

        #[cfg(feature = "parallel")]
        let entries = if self.config.parallel {
            use rayon::prelude::*;

            records
                .par_iter()
                .zip(proofs.into_par_iter())
                .enumerate()
                .map(|(i, (record, proof))| check(i, record, proof))
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            check_sequential(records, proofs, check)?
        };
        #[cfg(not(feature = "parallel"))]
        let entries = check_sequential(records, proofs, check)?;

        Ok(Commitment {
            root,
            proofs: entries,
        })
    }
}

fn check_sequential<F>(
    records: &[Record],
    proofs: Vec<Proof>,
    check: F,
) -> std::result::Result<Vec<ClaimProof>, ConsistencyFault>
where
    F: Fn(usize, &Record, Proof) -> std::result::Result<ClaimProof, ConsistencyFault>,
{
    records
        .iter()
        .zip(proofs)
        .enumerate()
        .map(|(i, (record, proof))| check(i, record, proof))
        .collect()
}

/// Serialize `commitment` to `path` as JSON.
pub fn write_commitment(path: &Path, commitment: &Commitment, pretty: bool) -> Result<()> {
    let bytes = commitment.to_json(pretty).map_err(|source| ClaimsError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| ClaimsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a previously written artifact.
pub fn load_commitment(path: &Path) -> Result<Commitment> {
    let bytes = fs::read(path).map_err(|source| ClaimsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Commitment::from_json(&bytes).map_err(|source| ClaimsError::Json {
        path: path.to_path_buf(),
        source,
    })
}
