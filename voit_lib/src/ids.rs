//! Municipality identifier source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::CrawlError;

/// File the CLI reads identifiers from when none is given.
pub const DEFAULT_IDS_FILE: &str = "municipality_ids.txt";

/// Whether a trimmed input line is a municipality id (ASCII digits only).
pub fn is_municipality_id(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

/// Collects the municipality ids from line-oriented input, in input order.
///
/// Lines are trimmed; anything that is not purely numeric is ignored.
pub fn parse_municipality_ids<R: BufRead>(reader: R) -> Result<Vec<String>, CrawlError> {
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let candidate = line.trim();
        if is_municipality_id(candidate) {
            ids.push(candidate.to_string());
        } else if !candidate.is_empty() {
            tracing::debug!(line = candidate, "ignoring non-numeric identifier line");
        }
    }
    Ok(ids)
}

/// Reads municipality ids from a file. See [`parse_municipality_ids`].
pub fn read_municipality_ids(path: &Path) -> Result<Vec<String>, CrawlError> {
    let file = File::open(path)?;
    parse_municipality_ids(BufReader::new(file))
}
