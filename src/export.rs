//! Co-author table construction and CSV output.
//!
//! Flattens co-author entries into a two-column table and writes it as
//! `Name,Affiliation` CSV. Rows keep their encounter order; duplicates from
//! the source pass through unchanged.

use crate::error::Result;
use crate::scholar::{AuthorRecord, CoauthorEntry, ScholarClient};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One output row. Field renames become the CSV header.
#[derive(Debug, Serialize)]
pub struct CoauthorRow {
    /// Co-author name
    #[serde(rename = "Name")]
    pub name: String,
    /// Co-author affiliation
    #[serde(rename = "Affiliation")]
    pub affiliation: String,
}

/// Map co-author entries to output rows, preserving encounter order.
pub fn build_table(entries: &[CoauthorEntry]) -> Vec<CoauthorRow> {
    entries
        .iter()
        .map(|entry| CoauthorRow {
            name: entry.name.clone(),
            affiliation: entry.affiliation.clone(),
        })
        .collect()
}

/// Write the co-author table to `path`.
///
/// Parent directories are created as needed and an existing file is
/// overwritten. An empty table still gets the header row.
pub fn write_table(path: &Path, entries: &[CoauthorEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    if entries.is_empty() {
        // serialize() only emits the header alongside a first record
        wtr.write_record(["Name", "Affiliation"])?;
    } else {
        for row in build_table(entries) {
            wtr.serialize(row)?;
        }
    }

    wtr.flush()?;
    info!(path = %path.display(), rows = entries.len(), "Saved co-author table");
    Ok(())
}

/// Fetch an author's co-authors and save them to `path`.
pub async fn save_coauthors(
    client: &ScholarClient,
    author: &AuthorRecord,
    path: &Path,
) -> Result<()> {
    let coauthors = client.fetch_coauthors(author).await?;
    write_table(path, &coauthors)
}
