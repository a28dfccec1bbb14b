//! Local manifest scanning.
//!
//! The set of already-downloaded activities is derived from filenames alone
//! (one file per activity, identifier as the stem). File contents are never
//! opened; presence is sufficient.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// Activity ids already materialized in `dir`.
///
/// The id is the filename stem up to the first `.`. Hidden files are
/// ignored. A missing or empty directory yields the empty set, not an
/// error: a fresh account simply has everything pending.
pub fn downloaded_ids(dir: &Path) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    if !dir.exists() {
        return Ok(ids);
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if let Some(id) = name.split('.').next() {
            if !id.is_empty() {
                ids.insert(id.to_string());
            }
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }

    #[test]
    fn missing_dir_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let ids = downloaded_ids(&dir.path().join("nope")).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn empty_dir_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        assert!(downloaded_ids(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn parses_ids_from_stems() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "417032501650163435.fit");
        touch(&dir, "417032501650163436.fit");
        let ids = downloaded_ids(dir.path()).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("417032501650163435"));
        assert!(ids.contains("417032501650163436"));
    }

    #[test]
    fn ignores_hidden_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir, ".DS_Store");
        touch(&dir, "123.fit");
        let ids = downloaded_ids(dir.path()).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("123"));
    }

    #[test]
    fn ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("456")).unwrap();
        touch(&dir, "123.fit");
        let ids = downloaded_ids(dir.path()).unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn stem_stops_at_first_dot() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "789.fit.gz");
        let ids = downloaded_ids(dir.path()).unwrap();
        assert!(ids.contains("789"));
    }
}
