//! tagsync: batch-synchronize inventory metadata into Zabbix host tags
//!
//! This tool reads site records from a CSV file and reconciles them against
//! the host tags of a Zabbix monitoring system over its JSON-RPC API.

use anyhow::Result;

fn main() -> Result<()> {
    tagsync::cli::run()
}
