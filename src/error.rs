// Error types shared by the session store, the HTTP adapter and the flows.
// Pages never show these directly: see `flows::Flow::failure_message`.

use reqwest::StatusCode;
use thiserror::Error;

// Errors raised by a token store backend
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("session lock poisoned")]
    Poisoned,
}

// Input rejected before anything is sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("year must be between {min} and {max} (got {year})")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

// Failures of the identity capability (login)
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider returned no token")]
    NoToken,
    #[error("failed to read token: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

// Everything a backend call can fail with
#[derive(Debug, Error)]
pub enum ClientError {
    // 401 from the backend; the session has already been cleared
    #[error("session expired or not authorized")]
    Unauthorized,
    // Any other non-success status, passed through untouched
    #[error("backend returned {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    // Status code of an HTTP failure, if the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
