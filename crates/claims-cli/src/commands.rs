//! Subcommand handlers.

use std::path::Path;

use anyhow::{bail, Context, Result};

use claims_merkle::{load_commitment, CommitmentPipeline, PipelineConfig};

pub fn generate(input: &Path, output: &Path, config: PipelineConfig) -> Result<()> {
    let commitment = CommitmentPipeline::new(config)
        .run_file(input, output)
        .with_context(|| format!("failed to generate proofs for {}", input.display()))?;
    println!("{}", commitment.root);
    Ok(())
}

pub fn root(input: &Path, config: PipelineConfig) -> Result<()> {
    let root = CommitmentPipeline::new(config)
        .root_file(input)
        .with_context(|| format!("failed to compute root of {}", input.display()))?;
    println!("{}", root);
    Ok(())
}

pub fn verify(artifact: &Path) -> Result<()> {
    let commitment = load_commitment(artifact)?;
    tracing::info!(entries = commitment.len(), root = %commitment.root, "verifying artifact");

    if let Some(index) = commitment.first_invalid() {
        let entry = &commitment.proofs[index];
        bail!(
            "proof {} for {} does not verify against root {}",
            index,
            entry.owner,
            commitment.root
        );
    }
    if !commitment.root_matches_records() {
        bail!(
            "entries of {} do not rebuild root {}",
            artifact.display(),
            commitment.root
        );
    }

    tracing::info!("artifact verified");
    println!("ok {} {}", commitment.len(), commitment.root);
    Ok(())
}
