//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use claims_merkle::record::{DEFAULT_DECIMALS, DEFAULT_SCALE_THRESHOLD};
use claims_merkle::{DuplicatePolicy, PipelineConfig, ScalePolicy};

#[derive(Parser, Debug)]
#[command(version, about = "Merkle commitments and proofs for claim lists")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the tree over a claim list and write every proof as JSON.
    Generate {
        /// Claim list, one `address[,weight]` per line
        input: PathBuf,
        /// Destination for the JSON artifact
        output: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        /// Pretty-print the artifact
        #[arg(long)]
        pretty: bool,
        /// Extract and verify proofs on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Print the root of a claim list.
    Root {
        input: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Re-verify every proof in a published artifact.
    Verify {
        artifact: PathBuf,
    },
}

/// Options controlling how claim lines become records.
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Raw weights below this are whole units and get scaled
    #[arg(long, env = "CLAIMS_SCALE_THRESHOLD", default_value_t = DEFAULT_SCALE_THRESHOLD)]
    pub scale_threshold: u128,
    /// Fractional digits used when scaling
    #[arg(long, env = "CLAIMS_DECIMALS", default_value_t = DEFAULT_DECIMALS)]
    pub decimals: u32,
    /// Take every weight verbatim, overriding the threshold
    #[arg(long)]
    pub no_scale: bool,
    /// Accept repeated owners instead of failing
    #[arg(long)]
    pub allow_duplicates: bool,
}

impl ParseArgs {
    pub fn scale_policy(&self) -> ScalePolicy {
        if self.no_scale {
            ScalePolicy::disabled()
        } else {
            ScalePolicy::default()
                .with_threshold(self.scale_threshold)
                .with_decimals(self.decimals)
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let duplicates = if self.allow_duplicates {
            DuplicatePolicy::Allow
        } else {
            DuplicatePolicy::Reject
        };
        PipelineConfig::default()
            .with_scale(self.scale_policy())
            .with_duplicates(duplicates)
    }
}
