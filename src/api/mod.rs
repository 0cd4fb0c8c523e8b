//! Zabbix JSON-RPC API gateway.
//!
//! [`ZabbixApi`] is the seam between the reconciler and the wire;
//! [`ZabbixClient`] is the blocking `ureq`-backed implementation.

pub mod client;

pub use client::ZabbixClient;

use crate::domain::{HostGroup, HostTag};
use serde_json::Value;

/// Errors from remote API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("response carries neither result nor error")]
    MissingResult,
}

/// The three remote operations the reconciler needs.
pub trait ZabbixApi {
    /// All host groups whose name exactly matches `name`.
    ///
    /// An empty vec means the group does not exist; choosing among multiple
    /// matches is the caller's decision.
    fn get_groups(&self, name: &str) -> Result<Vec<HostGroup>, ApiError>;

    /// Raw host records for a group, including each host's name and full tag
    /// set. Elements are returned undecoded so that the caller can fail one
    /// malformed record without discarding its siblings.
    fn list_hosts(&self, group_id: &str) -> Result<Vec<Value>, ApiError>;

    /// Replace the full tag list of a host. The remote API treats `tags` as
    /// an overwrite, not a patch, so merging happens before this call.
    fn update_tags(&self, host_id: &str, tags: &[HostTag]) -> Result<(), ApiError>;
}
