//! Bounded-parallelism download executor.
//!
//! Runs one download task per pending activity with at most
//! [`MAX_CONCURRENT_DOWNLOADS`] in flight, and completes only once every
//! task has finished. Task outcomes are collected individually; one
//! activity's failure never aborts its siblings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::session::{Fetched, RemoteSession, SessionError};
use crate::types::{ActivityRef, FileKind};

/// Concurrency ceiling for download tasks within one account's fetch phase.
pub const MAX_CONCURRENT_DOWNLOADS: usize = 10;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One download task that ended in error, keyed by activity id.
#[derive(Debug)]
pub struct FetchFailure {
    pub activity_id: String,
    pub error: SessionError,
}

/// Aggregate outcome of one fetch phase.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub saved: usize,
    pub skipped: usize,
    pub failures: Vec<FetchFailure>,
}

impl FetchReport {
    pub fn completed(&self) -> usize {
        self.saved + self.skipped + self.failures.len()
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Download every entry of `pending` into `dest`, at most `limit` at a time.
///
/// Each task acquires a semaphore permit before touching the network, so
/// no more than `limit` downloads are ever in flight. All tasks run to
/// completion regardless of sibling failures; the report carries every
/// per-task error.
pub async fn fetch_all<S>(
    session: Arc<S>,
    pending: Vec<ActivityRef>,
    kind: FileKind,
    dest: &Path,
    limit: usize,
) -> FetchReport
where
    S: RemoteSession + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let dest: PathBuf = dest.to_path_buf();
    let mut handles = Vec::with_capacity(pending.len());

    for activity in pending {
        let sem = semaphore.clone();
        let session = session.clone();
        let dest = dest.clone();
        let handle = tokio::spawn(async move {
            let _permit = match sem.acquire().await {
                Ok(p) => p,
                Err(_) => {
                    return (
                        activity.id.clone(),
                        Err(SessionError::Transport("semaphore closed".to_string())),
                    )
                }
            };
            let result = session.download(&activity, kind, &dest).await;
            (activity.id, result)
        });
        handles.push(handle);
    }

    let mut report = FetchReport::default();
    for handle in handles {
        match handle.await {
            Ok((_, Ok(Fetched::Saved(_)))) => report.saved += 1,
            Ok((_, Ok(Fetched::Unavailable))) => report.skipped += 1,
            Ok((id, Err(error))) => report.failures.push(FetchFailure {
                activity_id: id,
                error,
            }),
            Err(e) => report.failures.push(FetchFailure {
                activity_id: "unknown".to_string(),
                error: SessionError::Transport(format!("task join error: {e}")),
            }),
        }
    }
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Session that records how many downloads run concurrently.
    struct CountingSession {
        active: AtomicUsize,
        peak: AtomicUsize,
        fail_ids: HashSet<String>,
        unavailable_ids: HashSet<String>,
    }

    impl CountingSession {
        fn new() -> Self {
            CountingSession {
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                fail_ids: HashSet::new(),
                unavailable_ids: HashSet::new(),
            }
        }
    }

    #[async_trait]
    impl RemoteSession for CountingSession {
        async fn list_activities(
            &self,
            _only_run: bool,
        ) -> Result<Vec<ActivityRef>, SessionError> {
            Ok(Vec::new())
        }

        async fn download(
            &self,
            activity: &ActivityRef,
            kind: FileKind,
            dest: &Path,
        ) -> Result<Fetched, SessionError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.fail_ids.contains(&activity.id) {
                return Err(SessionError::Api(format!("boom for {}", activity.id)));
            }
            if self.unavailable_ids.contains(&activity.id) {
                return Ok(Fetched::Unavailable);
            }
            let path = dest.join(format!("{}.{}", activity.id, kind.extension()));
            std::fs::write(&path, b"raw")?;
            Ok(Fetched::Saved(path))
        }
    }

    fn pending(n: usize) -> Vec<ActivityRef> {
        (0..n).map(|i| ActivityRef::new(format!("{i}"), 100)).collect()
    }

    #[tokio::test]
    async fn ceiling_is_respected() {
        let dir = TempDir::new().unwrap();
        let session = Arc::new(CountingSession::new());
        let report = fetch_all(session.clone(), pending(25), FileKind::Fit, dir.path(), 10).await;
        assert_eq!(report.saved, 25);
        assert!(report.failures.is_empty());
        assert!(
            session.peak.load(Ordering::SeqCst) <= 10,
            "peak concurrency {} exceeded ceiling",
            session.peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn all_tasks_complete_despite_failures() {
        let dir = TempDir::new().unwrap();
        let mut session = CountingSession::new();
        session.fail_ids.insert("3".to_string());
        session.fail_ids.insert("7".to_string());
        let report = fetch_all(Arc::new(session), pending(10), FileKind::Fit, dir.path(), 4).await;
        assert_eq!(report.saved, 8);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.completed(), 10);
        let failed: HashSet<_> = report
            .failures
            .iter()
            .map(|f| f.activity_id.as_str())
            .collect();
        assert!(failed.contains("3") && failed.contains("7"));
    }

    #[tokio::test]
    async fn unavailable_counts_as_skip() {
        let dir = TempDir::new().unwrap();
        let mut session = CountingSession::new();
        session.unavailable_ids.insert("0".to_string());
        let report = fetch_all(Arc::new(session), pending(3), FileKind::Gpx, dir.path(), 10).await;
        assert_eq!(report.saved, 2);
        assert_eq!(report.skipped, 1);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn empty_pending_set_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let session = Arc::new(CountingSession::new());
        let report = fetch_all(session, Vec::new(), FileKind::Fit, dir.path(), 10).await;
        assert_eq!(report.completed(), 0);
    }

    #[tokio::test]
    async fn zero_limit_is_clamped_to_one() {
        let dir = TempDir::new().unwrap();
        let session = Arc::new(CountingSession::new());
        let report = fetch_all(session.clone(), pending(3), FileKind::Fit, dir.path(), 0).await;
        assert_eq!(report.saved, 3);
        assert_eq!(session.peak.load(Ordering::SeqCst), 1);
    }
}
