//! The seam between the orchestrator and a remote fitness service.
//!
//! The orchestrator only ever talks to these traits; the concrete Coros
//! client lives in its own crate and implements them. The session handle
//! is owned by one account's sync scope and its connection resources are
//! released when it is dropped at the end of that scope.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ActivityRef, FileKind};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("remote api error: {0}")]
    Api(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Download outcome
// ---------------------------------------------------------------------------

/// Result of one download task that completed without error.
///
/// `Unavailable` covers activities the service has no export for in the
/// requested format (e.g. indoor sessions have no GPX track). These are
/// skips, not failures; the next run will simply skip them again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Saved(PathBuf),
    Unavailable,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// An authenticated per-account handle to the remote service.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Full listing of remote activity ids and sport types.
    /// `only_run` restricts the listing to running activities.
    async fn list_activities(
        &self,
        only_run: bool,
    ) -> std::result::Result<Vec<ActivityRef>, SessionError>;

    /// Download one activity's raw file into `dest` in the given format.
    async fn download(
        &self,
        activity: &ActivityRef,
        kind: FileKind,
        dest: &Path,
    ) -> std::result::Result<Fetched, SessionError>;
}

/// Establishes a [`RemoteSession`] from credentials.
///
/// `secret_digest` is the one-way digest of the account secret; the raw
/// secret never crosses this boundary.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    type Session: RemoteSession + 'static;

    async fn login(
        &self,
        account: &str,
        secret_digest: &str,
    ) -> std::result::Result<Self::Session, SessionError>;
}
