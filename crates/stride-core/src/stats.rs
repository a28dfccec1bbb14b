//! Workspace diagnostic scan.
//!
//! Tabulates what is actually sitting in a raw-file directory: totals,
//! per-extension counts, empty downloads, and filenames that don't carry
//! a recoverable activity id. Contents are never decoded.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Default, Serialize)]
pub struct WorkspaceStats {
    pub total: usize,
    pub by_extension: BTreeMap<String, usize>,
    pub empty_files: usize,
    pub total_bytes: u64,
    /// Filenames whose stem does not parse as an activity id (non-numeric).
    pub unparsable: Vec<String>,
}

/// Scan `dir` and tabulate. A missing directory yields empty stats.
pub fn scan(dir: &Path) -> Result<WorkspaceStats> {
    let mut stats = WorkspaceStats::default();
    if !dir.exists() {
        return Ok(stats);
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        stats.total += 1;
        let meta = entry.metadata()?;
        stats.total_bytes += meta.len();
        if meta.len() == 0 {
            stats.empty_files += 1;
        }

        let ext = name
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_else(|| "(none)".to_string());
        *stats.by_extension.entry(ext).or_insert(0) += 1;

        let stem = name.split('.').next().unwrap_or("");
        if stem.is_empty() || !stem.chars().all(|c| c.is_ascii_digit()) {
            stats.unparsable.push(name);
        }
    }
    stats.unparsable.sort();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_dir_yields_empty_stats() {
        let dir = TempDir::new().unwrap();
        let stats = scan(&dir.path().join("nope")).unwrap();
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn tabulates_extensions_and_sizes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("101.fit"), b"abcd").unwrap();
        std::fs::write(dir.path().join("102.fit"), b"ab").unwrap();
        std::fs::write(dir.path().join("103.gpx"), b"").unwrap();

        let stats = scan(dir.path()).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_extension["fit"], 2);
        assert_eq!(stats.by_extension["gpx"], 1);
        assert_eq!(stats.empty_files, 1);
        assert_eq!(stats.total_bytes, 6);
        assert!(stats.unparsable.is_empty());
    }

    #[test]
    fn flags_unparsable_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("101.fit"), b"x").unwrap();

        let stats = scan(dir.path()).unwrap();
        assert_eq!(stats.unparsable, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn skips_hidden_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        let stats = scan(dir.path()).unwrap();
        assert_eq!(stats.total, 0);
    }
}
