//! Sync command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::api::ZabbixClient;
use crate::config::load_settings;
use crate::inventory;
use crate::sync::{Reconciler, SyncOptions};

#[derive(Args)]
pub struct SyncArgs {
    /// Path to config file (defaults to tagsync.toml in the working directory)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input CSV path (overrides csv_file_path from the config)
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Resolve groups and merge tags, but send no host.update call
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: SyncArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let settings = load_settings(&cwd, args.config.as_deref())?;

    let csv_path = args.csv.unwrap_or_else(|| settings.csv_file_path.clone());
    info!("Reading CSV file from: {}", csv_path.display());
    let rows = inventory::load_rows(&csv_path)?;
    info!("Successfully loaded CSV with {} rows", rows.len());

    info!("Connecting to endpoint: {}", settings.api_endpoint);
    let client = ZabbixClient::new(
        &settings.api_endpoint,
        &settings.auth_token,
        settings.timeout(),
    );

    let reconciler = Reconciler::new(
        &client,
        SyncOptions {
            dry_run: args.dry_run,
        },
    );
    let summary = reconciler.run(&rows);

    info!("Run complete: {}", summary);
    println!("{}", summary);

    // Per-row and per-host failures are best-effort by design; only a config
    // or CSV load failure above makes this command exit nonzero.
    Ok(())
}
