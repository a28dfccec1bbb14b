//! Consolidated artifact generation.
//!
//! Rebuilds one account's database and JSON export from its workspace.
//! The rebuild is full, not incremental: every run replaces prior output
//! wholesale, so re-running against an unchanged workspace is safe and
//! produces the same rows. Raw file contents are never decoded; the
//! catalog works from directory metadata only.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io;
use crate::types::FileKind;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The database/export pair produced for one account.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSet {
    pub database: PathBuf,
    pub export: PathBuf,
    pub activity_count: usize,
}

/// One cataloged activity file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub file_name: String,
    pub kind: FileKind,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

/// Sidecar written next to the export, from the publishing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMeta {
    pub account: String,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// (Re)build the ArtifactSet for one workspace.
///
/// Scans `workspace` for files of the given kind, writes the catalog to a
/// SQLite database at `db_path` and a JSON export at `export_path`, and
/// drops an `ExportMeta` sidecar beside the export. Prior output is
/// overwritten; the workspace itself is never modified.
pub fn build(
    workspace: &Path,
    db_path: &Path,
    export_path: &Path,
    kind: FileKind,
    account: &str,
) -> Result<ArtifactSet> {
    let records = scan_workspace(workspace, kind)?;

    write_database(db_path, &records)?;
    io::atomic_write(export_path, serde_json::to_vec_pretty(&records)?.as_slice())?;

    let meta = ExportMeta {
        account: account.to_string(),
        updated_at: Utc::now(),
    };
    let meta_path = export_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(crate::paths::META_FILE);
    io::atomic_write(&meta_path, serde_json::to_vec_pretty(&meta)?.as_slice())?;

    Ok(ArtifactSet {
        database: db_path.to_path_buf(),
        export: export_path.to_path_buf(),
        activity_count: records.len(),
    })
}

/// Catalog raw files of `kind` in `workspace`, sorted by activity id for
/// deterministic output.
fn scan_workspace(workspace: &Path, kind: FileKind) -> Result<Vec<ActivityRecord>> {
    let mut records = Vec::new();
    if !workspace.exists() {
        return Ok(records);
    }
    for entry in std::fs::read_dir(workspace)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let Some(stem) = name.strip_suffix(&format!(".{}", kind.extension())) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        let meta = entry.metadata()?;
        records.push(ActivityRecord {
            id: stem.to_string(),
            file_name: name,
            kind,
            size_bytes: meta.len(),
            modified_at: meta.modified()?.into(),
        });
    }
    records.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(records)
}

fn write_database(db_path: &Path, records: &[ActivityRecord]) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        io::ensure_dir(parent)?;
    }
    let mut conn = Connection::open(db_path)?;
    let tx = conn.transaction()?;
    tx.execute("DROP TABLE IF EXISTS activities", [])?;
    tx.execute(
        "CREATE TABLE activities (
            id          TEXT PRIMARY KEY,
            file_name   TEXT NOT NULL,
            kind        TEXT NOT NULL,
            size_bytes  INTEGER NOT NULL,
            modified_at TEXT NOT NULL
        )",
        [],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO activities (id, file_name, kind, size_bytes, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for r in records {
            stmt.execute(rusqlite::params![
                r.id,
                r.file_name,
                r.kind.as_str(),
                r.size_bytes as i64,
                r.modified_at.to_rfc3339(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
