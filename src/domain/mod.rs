//! Core types shared across the crate.

use serde::{Deserialize, Serialize};

/// Tag keys this tool exclusively owns, in the order they are written.
///
/// Any existing host tag with one of these keys is discarded and replaced on
/// every update; tags with other keys pass through untouched.
pub const MANAGED_TAG_KEYS: [&str; 5] =
    ["COUNTRY", "SITE_NAME", "SITE_ID", "PARKID", "TECHNOLOGY"];

/// A host group as returned by `hostgroup.get`. Resolved read-only; never
/// created or mutated here.
#[derive(Debug, Clone, Deserialize)]
pub struct HostGroup {
    pub groupid: String,
    pub name: String,
}

/// One `(key, value)` tag entry, in the wire shape used by `selectTags` and
/// `host.update`.
///
/// Zabbix does not guarantee unique keys, so tag lists are ordered sequences,
/// not maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTag {
    pub tag: String,
    pub value: String,
}

impl HostTag {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Whether this tag's key is one of [`MANAGED_TAG_KEYS`].
    pub fn is_managed(&self) -> bool {
        MANAGED_TAG_KEYS.contains(&self.tag.as_str())
    }
}

/// A host as returned by `host.get`.
///
/// `hostid` is required; a record without one is a contract violation by the
/// remote API and fails deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Host {
    pub hostid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<HostTag>,
}

/// One record of the input CSV. Field names match the header row; additional
/// columns in the file are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteRow {
    pub groupname: String,
    pub site_country: String,
    pub site_name: String,
    pub site_id: String,
    pub park_id: String,
    pub technology: String,
}

impl SiteRow {
    /// The five managed tags carrying this row's values, in managed-key order.
    pub fn managed_tags(&self) -> Vec<HostTag> {
        vec![
            HostTag::new("COUNTRY", self.site_country.as_str()),
            HostTag::new("SITE_NAME", self.site_name.as_str()),
            HostTag::new("SITE_ID", self.site_id.as_str()),
            HostTag::new("PARKID", self.park_id.as_str()),
            HostTag::new("TECHNOLOGY", self.technology.as_str()),
        ]
    }
}
