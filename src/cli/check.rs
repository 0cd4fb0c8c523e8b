//! Check command implementation
//!
//! Offline validation of the config file and the CSV input, for catching
//! malformed input before a run touches the remote system.

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::load_settings;
use crate::inventory;

#[derive(Args)]
pub struct CheckArgs {
    /// Path to config file (defaults to tagsync.toml in the working directory)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input CSV path (overrides csv_file_path from the config)
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let settings = load_settings(&cwd, args.config.as_deref())?;

    let csv_path = args.csv.unwrap_or_else(|| settings.csv_file_path.clone());
    let rows = inventory::load_rows(&csv_path)?;

    let groups: BTreeSet<&str> = rows.iter().map(|row| row.groupname.as_str()).collect();

    println!("Config OK: endpoint {}", settings.api_endpoint);
    println!(
        "CSV OK: {} rows, {} distinct groups",
        rows.len(),
        groups.len()
    );
    for group in groups {
        println!("  {}", group);
    }

    Ok(())
}
