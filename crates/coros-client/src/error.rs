use stride_core::session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorosError {
    #[error("login rejected: {0}")]
    Auth(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CorosError> for SessionError {
    fn from(e: CorosError) -> Self {
        match e {
            CorosError::Auth(m) => SessionError::Auth(m),
            CorosError::Api(m) => SessionError::Api(m),
            CorosError::UnexpectedStatus(s) => SessionError::Api(format!("unexpected status {s}")),
            CorosError::Http(e) => SessionError::Transport(e.to_string()),
            CorosError::Io(e) => SessionError::Io(e),
        }
    }
}
