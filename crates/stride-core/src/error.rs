use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum StrideError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid account name '{0}': must be alphanumeric with '-' or '_'")]
    InvalidAccountName(String),

    #[error("missing credentials for account '{0}'")]
    MissingCredentials(String),

    #[error("unsupported file kind '{0}': expected fit, gpx, or tcx")]
    UnsupportedFileKind(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StrideError>;
