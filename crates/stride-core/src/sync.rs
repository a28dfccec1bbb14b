//! Multi-account sync orchestration.
//!
//! Accounts are processed strictly one after another; the only true
//! parallelism in the system is the bounded download executor inside a
//! single account's fetch phase. Each account's filesystem side effects
//! are confined to its own workspace, and the remote session handle is
//! owned by the account's scope so its connection resources are released
//! exactly once, on every exit path, when the scope ends.
//!
//! Every collaborator failure is caught at the account boundary and
//! recorded as a tagged outcome; nothing propagates past the account
//! loop, so one account can never abort the batch for the others.

use std::path::Path;
use std::sync::Arc;

use md5::{Digest, Md5};
use serde::Serialize;

use crate::artifact::{self, ArtifactSet};
use crate::config::{UserAccount, UsersConfig};
use crate::error::StrideError;
use crate::fetch::{self, FetchFailure, FetchReport, MAX_CONCURRENT_DOWNLOADS};
use crate::io;
use crate::manifest;
use crate::paths;
use crate::session::{RemoteSession, SessionConnector};
use crate::types::{ActivityRef, FileKind};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub kind: FileKind,
    pub only_run: bool,
    pub concurrency: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            kind: FileKind::Fit,
            only_run: false,
            concurrency: MAX_CONCURRENT_DOWNLOADS,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Where in the per-account pipeline a fatal failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    Config,
    Workspace,
    Login,
    List,
    Build,
}

impl SyncStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStage::Config => "config",
            SyncStage::Workspace => "workspace",
            SyncStage::Login => "login",
            SyncStage::List => "list",
            SyncStage::Build => "build",
        }
    }
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account-fatal failure: the stage it happened in plus the cause.
#[derive(Debug)]
pub struct AccountFailure {
    pub stage: SyncStage,
    pub source: StrideError,
}

impl std::fmt::Display for AccountFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.source)
    }
}

/// What one successfully-processed account did this pass.
#[derive(Debug)]
pub struct SyncSummary {
    pub remote: usize,
    pub pending: usize,
    pub saved: usize,
    pub skipped: usize,
    pub fetch_failures: Vec<FetchFailure>,
    pub artifacts: ArtifactSet,
}

#[derive(Debug)]
pub struct AccountOutcome {
    pub account: String,
    pub result: Result<SyncSummary, AccountFailure>,
}

/// Aggregated per-account outcomes for one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<AccountOutcome>,
}

impl BatchReport {
    pub fn failed_accounts(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

// ---------------------------------------------------------------------------
// Secret digest
// ---------------------------------------------------------------------------

/// One-way digest of the raw account secret. The remote service
/// authenticates with the MD5 hex of the password; the raw secret is
/// never stored or passed beyond this transformation.
pub fn digest_secret(raw: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(raw.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Sync every configured account, one at a time, to completion or to a
/// recorded failure. Always attempts every account.
pub async fn sync_accounts<C>(
    connector: &C,
    cfg: &UsersConfig,
    root: &Path,
    opts: &SyncOptions,
) -> BatchReport
where
    C: SessionConnector,
{
    let mut outcomes = Vec::with_capacity(cfg.users.len());
    for user in &cfg.users {
        tracing::info!(account = %user.name, "starting sync");
        let result = sync_account(connector, user, root, opts).await;
        match &result {
            Ok(summary) => tracing::info!(
                account = %user.name,
                remote = summary.remote,
                saved = summary.saved,
                "sync complete"
            ),
            Err(failure) => tracing::warn!(
                account = %user.name,
                stage = %failure.stage,
                error = %failure.source,
                "account skipped"
            ),
        }
        outcomes.push(AccountOutcome {
            account: user.name.clone(),
            result,
        });
    }
    BatchReport { outcomes }
}

fn fail(stage: SyncStage) -> impl FnOnce(StrideError) -> AccountFailure {
    move |source| AccountFailure { stage, source }
}

async fn sync_account<C>(
    connector: &C,
    user: &UserAccount,
    root: &Path,
    opts: &SyncOptions,
) -> Result<SyncSummary, AccountFailure>
where
    C: SessionConnector,
{
    paths::validate_account_name(&user.name).map_err(fail(SyncStage::Config))?;
    let creds = user.credentials().ok_or_else(|| AccountFailure {
        stage: SyncStage::Config,
        source: StrideError::MissingCredentials(user.name.clone()),
    })?;

    let workspace = paths::workspace_dir(root, &user.name, opts.kind);
    io::ensure_dir(&workspace).map_err(fail(SyncStage::Workspace))?;

    // The session lives for exactly this scope; dropping it (any exit
    // path below) releases its connection resources once.
    let digest = digest_secret(&creds.password);
    let session = connector
        .login(&creds.account, &digest)
        .await
        .map_err(|e| fail(SyncStage::Login)(e.into()))?;
    let session = Arc::new(session);

    let remote = session
        .list_activities(opts.only_run)
        .await
        .map_err(|e| fail(SyncStage::List)(e.into()))?;
    let local = manifest::downloaded_ids(&workspace).map_err(fail(SyncStage::List))?;

    let pending: Vec<ActivityRef> = remote
        .iter()
        .filter(|a| !local.contains(&a.id))
        .cloned()
        .collect();
    tracing::info!(
        account = %user.name,
        remote = remote.len(),
        pending = pending.len(),
        "computed pending set"
    );

    let report = if pending.is_empty() {
        FetchReport::default()
    } else {
        fetch::fetch_all(
            Arc::clone(&session),
            pending.clone(),
            opts.kind,
            &workspace,
            opts.concurrency,
        )
        .await
    };
    for failure in &report.failures {
        tracing::warn!(
            account = %user.name,
            activity = %failure.activity_id,
            error = %failure.error,
            "download failed"
        );
    }

    // Build failure leaves the downloaded raw files untouched; the next
    // run recomputes an empty pending set and retries only the build.
    let artifacts = artifact::build(
        &workspace,
        &paths::database_path(root, &user.name),
        &paths::export_path(root, &user.name),
        opts.kind,
        &user.name,
    )
    .map_err(fail(SyncStage::Build))?;

    Ok(SyncSummary {
        remote: remote.len(),
        pending: pending.len(),
        saved: report.saved,
        skipped: report.skipped,
        fetch_failures: report.failures,
        artifacts,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
