//! Command-line entry point for claim proof generation.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the printed root.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Generate {
            input,
            output,
            parse,
            pretty,
            sequential,
        } => {
            let config = parse
                .pipeline_config()
                .with_pretty(pretty)
                .with_parallel(!sequential && cfg!(feature = "parallel"));
            commands::generate(&input, &output, config)
        }
        Commands::Root { input, parse } => commands::root(&input, parse.pipeline_config()),
        Commands::Verify { artifact } => commands::verify(&artifact),
    }
}
