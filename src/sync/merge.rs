//! Tag merging.

use crate::domain::HostTag;

/// Merge a host's existing tags with the replacement managed tags.
///
/// Existing entries with a managed key are dropped; everything else keeps its
/// original relative order and is followed by `new_tags` in the order given.
/// Non-managed duplicates pass through untouched, and merging the output a
/// second time with the same `new_tags` yields the same list.
pub fn merge_tags(existing: &[HostTag], new_tags: &[HostTag]) -> Vec<HostTag> {
    let mut merged: Vec<HostTag> = existing
        .iter()
        .filter(|tag| !tag.is_managed())
        .cloned()
        .collect();
    merged.extend_from_slice(new_tags);
    merged
}
