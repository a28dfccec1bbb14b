use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, ORIGIN, REFERER, USER_AGENT};

use stride_core::session::{Fetched, RemoteSession, SessionConnector, SessionError};
use stride_core::types::{ActivityRef, FileKind};

use crate::error::CorosError;
use crate::types::{ActivityPage, ApiEnvelope, DownloadData, LoginData};

// ─── Constants ────────────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://teamcnapi.coros.com";

const PAGE_SIZE: u32 = 20;
/// Sport mode filter applied when listing only running activities.
const RUNNING_MODES: &str = "100,101,102,103";
/// Indoor runs have no GPS track, so the service offers no GPX export.
const INDOOR_SPORT_TYPE: i64 = 101;

const ORIGIN_URL: &str = "https://t.coros.com";
const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Remote code for each export format.
fn file_type_code(kind: FileKind) -> u8 {
    match kind {
        FileKind::Gpx => 1,
        FileKind::Tcx => 3,
        FileKind::Fit => 4,
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ORIGIN, HeaderValue::from_static(ORIGIN_URL));
    headers.insert(REFERER, HeaderValue::from_static("https://t.coros.com/"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    headers
}

// ─── CorosClient ──────────────────────────────────────────────────────────

/// Unauthenticated entry point. `login` produces a [`CorosSession`].
pub struct CorosClient {
    http: reqwest::Client,
    base_url: String,
}

impl CorosClient {
    pub fn new() -> Result<Self, CorosError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different API host (tests use this).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CorosError> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers())
            .build()?;
        Ok(CorosClient {
            http,
            base_url: base_url.into(),
        })
    }

    async fn authenticate(
        &self,
        account: &str,
        password_md5: &str,
    ) -> Result<CorosSession, CorosError> {
        let url = format!("{}/account/login", self.base_url);
        let body = serde_json::json!({
            "account": account,
            "accountType": 2,
            "pwd": password_md5,
        });
        let envelope: ApiEnvelope<LoginData> =
            self.http.post(&url).json(&body).send().await?.json().await?;

        let token = envelope
            .data
            .and_then(|d| d.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CorosError::Auth(
                    envelope
                        .message
                        .unwrap_or_else(|| "no access token in response".to_string()),
                )
            })?;

        tracing::debug!(account, "coros login succeeded");
        Ok(CorosSession {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        })
    }
}

// ─── CorosSession ─────────────────────────────────────────────────────────

/// Authenticated per-account handle. Dropping the session releases the
/// underlying connection pool.
#[derive(Debug)]
pub struct CorosSession {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CorosSession {
    fn cookie(&self) -> String {
        format!("CPL-coros-region=2; CPL-coros-token={}", self.token)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("accesstoken", self.token.as_str())
            .header(COOKIE, self.cookie())
    }

    async fn list_all(&self, only_run: bool) -> Result<Vec<ActivityRef>, CorosError> {
        let mode_list = if only_run { RUNNING_MODES } else { "" };
        let mut page = 1u32;
        let mut all = Vec::new();

        loop {
            let url = format!(
                "{}/activity/query?modeList={}&pageNumber={}&size={}",
                self.base_url, mode_list, page, PAGE_SIZE
            );
            let envelope: ApiEnvelope<ActivityPage> =
                self.authed(self.http.get(&url)).send().await?.json().await?;
            let rows = envelope.data.map(|d| d.data_list).unwrap_or_default();
            if rows.is_empty() {
                break;
            }
            for row in rows {
                let Some(label_id) = row.label_id else {
                    continue;
                };
                all.push(ActivityRef::new(label_id.to_string(), row.sport_type));
            }
            page += 1;
        }

        tracing::debug!(count = all.len(), only_run, "listed remote activities");
        Ok(all)
    }

    async fn fetch_one(
        &self,
        activity: &ActivityRef,
        kind: FileKind,
        dest: &Path,
    ) -> Result<Fetched, CorosError> {
        if activity.sport == INDOOR_SPORT_TYPE && kind == FileKind::Gpx {
            return Ok(Fetched::Unavailable);
        }

        let url = format!(
            "{}/activity/detail/download?labelId={}&sportType={}&fileType={}",
            self.base_url,
            activity.id,
            activity.sport,
            file_type_code(kind)
        );
        let envelope: ApiEnvelope<DownloadData> =
            self.authed(self.http.post(&url)).send().await?.json().await?;
        let Some(file_url) = envelope.data.and_then(|d| d.file_url) else {
            // The service has no export for this activity in this format.
            return Ok(Fetched::Unavailable);
        };

        let response = self.authed(self.http.get(&file_url)).send().await?;
        if !response.status().is_success() {
            return Err(CorosError::UnexpectedStatus(response.status()));
        }
        let bytes = response.bytes().await?;

        let path = dest.join(file_basename(&file_url, activity, kind));
        std::fs::write(&path, &bytes)?;
        Ok(Fetched::Saved(path))
    }
}

/// Basename of the served file URL, query string stripped. Falls back to
/// `<id>.<ext>` when the URL has no usable path component.
fn file_basename(file_url: &str, activity: &ActivityRef, kind: FileKind) -> String {
    file_url
        .split('?')
        .next()
        .and_then(|p| p.rsplit('/').next())
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("{}.{}", activity.id, kind.extension()))
}

// ─── Trait wiring ─────────────────────────────────────────────────────────

#[async_trait]
impl SessionConnector for CorosClient {
    type Session = CorosSession;

    async fn login(
        &self,
        account: &str,
        secret_digest: &str,
    ) -> Result<CorosSession, SessionError> {
        Ok(self.authenticate(account, secret_digest).await?)
    }
}

#[async_trait]
impl RemoteSession for CorosSession {
    async fn list_activities(&self, only_run: bool) -> Result<Vec<ActivityRef>, SessionError> {
        Ok(self.list_all(only_run).await?)
    }

    async fn download(
        &self,
        activity: &ActivityRef,
        kind: FileKind,
        dest: &Path,
    ) -> Result<Fetched, SessionError> {
        Ok(self.fetch_one(activity, kind, dest).await?)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
