//! Typed views of the Coros team API responses. Only the fields the
//! client consumes are declared; everything else is ignored on the wire.

use serde::Deserialize;

// ─── Envelope ─────────────────────────────────────────────────────────────

/// Every endpoint wraps its payload in `{ data, message, ... }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

// ─── Login ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(default)]
    pub access_token: Option<String>,
}

// ─── Activity listing ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPage {
    #[serde(default)]
    pub data_list: Vec<ActivityRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    /// Missing on some synthetic rows; those are skipped by the listing.
    #[serde(default)]
    pub label_id: Option<LabelId>,
    #[serde(default)]
    pub sport_type: i64,
}

/// The service emits `labelId` as either a JSON number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LabelId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelId::Number(n) => write!(f, "{n}"),
            LabelId::Text(s) => f.write_str(s),
        }
    }
}

// ─── Download ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadData {
    #[serde(default)]
    pub file_url: Option<String>,
}

// ─── Tests ────────────────────────────────────────────────────────────────
