//! Config file loading

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `auth_token` from the file.
pub const AUTH_TOKEN_ENV: &str = "TAGSYNC_AUTH_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// JSON-RPC endpoint URL, e.g. `https://zabbix.example.com/api_jsonrpc.php`.
    pub api_endpoint: String,
    /// Bearer token sent in the `Authorization` header.
    pub auth_token: String,
    /// Path to the semicolon-delimited input CSV.
    pub csv_file_path: PathBuf,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load settings from `config_path`, or from the first discovered candidate
/// under `cwd` when no explicit path is given.
pub fn load_settings(cwd: &Path, config_path: Option<&Path>) -> Result<Settings> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => discover_config(cwd).context(
            "no config file found (looked for tagsync.toml and .tagsync.toml); pass --config",
        )?,
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let mut settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Invalid TOML config: {}", config_file.display()))?;

    if let Ok(token) = std::env::var(AUTH_TOKEN_ENV) {
        if !token.is_empty() {
            settings.auth_token = token;
        }
    }

    Ok(settings)
}

fn discover_config(cwd: &Path) -> Option<PathBuf> {
    let candidates = ["tagsync.toml", ".tagsync.toml"];

    for candidate in candidates {
        let path = cwd.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}
