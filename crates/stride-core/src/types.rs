use serde::{Deserialize, Serialize};

use crate::error::StrideError;

// ---------------------------------------------------------------------------
// FileKind
// ---------------------------------------------------------------------------

/// Raw activity file format requested from the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Fit,
    Gpx,
    Tcx,
}

impl FileKind {
    pub fn all() -> &'static [FileKind] {
        &[FileKind::Fit, FileKind::Gpx, FileKind::Tcx]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Fit => "fit",
            FileKind::Gpx => "gpx",
            FileKind::Tcx => "tcx",
        }
    }

    /// Filename extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileKind {
    type Err = StrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fit" => Ok(FileKind::Fit),
            "gpx" => Ok(FileKind::Gpx),
            "tcx" => Ok(FileKind::Tcx),
            _ => Err(StrideError::UnsupportedFileKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityRef
// ---------------------------------------------------------------------------

/// One activity as reported by the remote listing: identifier plus the
/// service's numeric sport type. Rebuilt from scratch every sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRef {
    pub id: String,
    pub sport: i64,
}

impl ActivityRef {
    pub fn new(id: impl Into<String>, sport: i64) -> Self {
        ActivityRef {
            id: id.into(),
            sport,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
