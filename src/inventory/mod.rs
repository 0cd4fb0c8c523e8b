//! Input CSV loading.
//!
//! The inventory file is semicolon-delimited UTF-8, optionally carrying a
//! byte order mark, with a required header row naming the six expected
//! columns. Additional columns are ignored. Rows come back in file order.

use crate::domain::SiteRow;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Read all rows from the inventory CSV at `path`.
pub fn load_rows(path: &Path) -> Result<Vec<SiteRow>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed reading CSV file: {}", path.display()))?;
    parse_rows(&bytes).with_context(|| format!("Invalid CSV file: {}", path.display()))
}

/// Parse semicolon-delimited CSV bytes into rows, stripping a leading UTF-8
/// BOM when present.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<SiteRow>> {
    let data = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(data);

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<SiteRow>().enumerate() {
        let row = record.with_context(|| format!("row {}", idx + 1))?;
        rows.push(row);
    }

    Ok(rows)
}
