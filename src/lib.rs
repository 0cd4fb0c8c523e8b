//! tagsync: batch-synchronize inventory metadata into Zabbix host tags
//!
//! Reads site records from a semicolon-delimited CSV file and pushes them as
//! host tags through the Zabbix JSON-RPC API, group by group. Tags owned by
//! this tool are replaced on every run; all other tags on a host pass through
//! untouched.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod inventory;
pub mod sync;
