//! Command-line interface for tagsync
//!
//! Provides `sync` and `check` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod check;
mod sync;

/// Batch-synchronize inventory metadata from CSV into Zabbix host tags
#[derive(Parser)]
#[command(name = "tagsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the batch update against the configured Zabbix endpoint
    Sync(sync::SyncArgs),

    /// Validate configuration and CSV input without touching the API
    Check(check::CheckArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    // Progress is the tool's only user-visible output, so the default is INFO.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Sync(args) => sync::run(args),
        Commands::Check(args) => check::run(args),
    }
}
