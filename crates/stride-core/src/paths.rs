use crate::error::{Result, StrideError};
use crate::types::FileKind;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const USERS_FILE: &str = "users.yaml";
pub const DATA_USERS_DIR: &str = "data/users";
pub const PUBLIC_USERS_DIR: &str = "public/users";

pub const DATABASE_FILE: &str = "data.db";
pub const EXPORT_FILE: &str = "activities.json";
pub const META_FILE: &str = "meta.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<root>/data/users/<account>`: private data for one account.
pub fn account_dir(root: &Path, account: &str) -> PathBuf {
    root.join(DATA_USERS_DIR).join(account)
}

/// `<root>/data/users/<account>/FIT_OUT` (kind uppercased): the workspace
/// holding raw downloaded activity files, exclusively owned by one account.
pub fn workspace_dir(root: &Path, account: &str, kind: FileKind) -> PathBuf {
    account_dir(root, account).join(format!("{}_OUT", kind.as_str().to_uppercase()))
}

/// `<root>/data/users/<account>/data.db`
pub fn database_path(root: &Path, account: &str) -> PathBuf {
    account_dir(root, account).join(DATABASE_FILE)
}

/// `<root>/public/users/<account>`: published artifacts for one account.
pub fn public_dir(root: &Path, account: &str) -> PathBuf {
    root.join(PUBLIC_USERS_DIR).join(account)
}

/// `<root>/public/users/<account>/activities.json`
pub fn export_path(root: &Path, account: &str) -> PathBuf {
    public_dir(root, account).join(EXPORT_FILE)
}

/// `<root>/public/users/<account>/meta.json`
pub fn meta_path(root: &Path, account: &str) -> PathBuf {
    public_dir(root, account).join(META_FILE)
}

// ---------------------------------------------------------------------------
// Account name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").unwrap())
}

/// Account names become directory components under `data/` and `public/`,
/// so anything that could traverse or collide is rejected up front.
pub fn validate_account_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 || !name_re().is_match(name) {
        return Err(StrideError::InvalidAccountName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
