//! Row-driven reconciliation of CSV inventory against Zabbix host tags.
//!
//! Each row is processed independently in file order; hosts within a group in
//! API return order. Per-row and per-host failures are logged and counted,
//! never escalated — a run always walks the whole file.

pub mod merge;

pub use merge::merge_tags;

use crate::api::{ApiError, ZabbixApi};
use crate::domain::{Host, SiteRow};
use std::fmt;
use tracing::{error, info, warn};

/// Options for one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Resolve and merge, but send no `host.update` call.
    pub dry_run: bool,
}

/// Outcome counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows whose host loop completed (possibly with per-host failures).
    pub rows_processed: usize,
    /// Rows skipped because no host group matched.
    pub rows_skipped: usize,
    /// Rows abandoned on a group-resolution or host-listing failure.
    pub rows_failed: usize,
    /// Hosts updated (or, under dry-run, that would have been).
    pub hosts_updated: usize,
    /// Hosts whose record was malformed or whose update failed.
    pub hosts_failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows: {} processed, {} skipped, {} failed; hosts: {} updated, {} failed",
            self.rows_processed,
            self.rows_skipped,
            self.rows_failed,
            self.hosts_updated,
            self.hosts_failed
        )
    }
}

enum RowOutcome {
    Processed,
    GroupNotFound,
}

/// Walks input rows in order and pushes merged tag sets through the API.
pub struct Reconciler<'a> {
    api: &'a dyn ZabbixApi,
    options: SyncOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(api: &'a dyn ZabbixApi, options: SyncOptions) -> Self {
        Self { api, options }
    }

    /// Process every row, best-effort. Failures are logged with enough
    /// context to correlate with remote state; only counters come back.
    pub fn run(&self, rows: &[SiteRow]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (idx, row) in rows.iter().enumerate() {
            info!(
                "Processing row {}/{}: group '{}'",
                idx + 1,
                rows.len(),
                row.groupname
            );
            match self.process_row(row, &mut summary) {
                Ok(RowOutcome::Processed) => summary.rows_processed += 1,
                Ok(RowOutcome::GroupNotFound) => {
                    warn!("No group found for '{}', skipping row", row.groupname);
                    summary.rows_skipped += 1;
                }
                Err(err) => {
                    error!("Row {} (group '{}') failed: {}", idx + 1, row.groupname, err);
                    summary.rows_failed += 1;
                }
            }
        }

        summary
    }

    fn process_row(
        &self,
        row: &SiteRow,
        summary: &mut RunSummary,
    ) -> Result<RowOutcome, ApiError> {
        let groups = self.api.get_groups(&row.groupname)?;
        let Some(group) = groups.first() else {
            return Ok(RowOutcome::GroupNotFound);
        };
        if groups.len() > 1 {
            warn!(
                "Group name '{}' is ambiguous ({} matches); using id {}",
                row.groupname,
                groups.len(),
                group.groupid
            );
        }

        let raw_hosts = self.api.list_hosts(&group.groupid)?;
        info!(
            "Found {} hosts in group '{}' (id {})",
            raw_hosts.len(),
            row.groupname,
            group.groupid
        );

        let new_tags = row.managed_tags();
        for raw in raw_hosts {
            // One malformed record must not take down its siblings.
            let host: Host = match serde_json::from_value(raw) {
                Ok(host) => host,
                Err(err) => {
                    error!(
                        "Malformed host record in group '{}': {}",
                        row.groupname, err
                    );
                    summary.hosts_failed += 1;
                    continue;
                }
            };

            let final_tags = merge_tags(&host.tags, &new_tags);

            if self.options.dry_run {
                info!(
                    "Dry run: would update host {} with {} tags",
                    host.hostid,
                    final_tags.len()
                );
                summary.hosts_updated += 1;
                continue;
            }

            match self.api.update_tags(&host.hostid, &final_tags) {
                Ok(()) => {
                    info!("Successfully updated host {}", host.hostid);
                    summary.hosts_updated += 1;
                }
                Err(err) => {
                    error!("Failed to update host {}: {}", host.hostid, err);
                    summary.hosts_failed += 1;
                }
            }
        }

        Ok(RowOutcome::Processed)
    }
}
