use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while opening or closing a database session
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("{0}")]
    Unreachable(String),
    #[error("{0}")]
    AuthRejected(String),
    #[error("{0}")]
    DatabaseNotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Connection timeout after {0:?}")]
    Timeout(Duration),
    #[error("Connection failed: {0}")]
    Failed(String),
    #[error("TLS setup failed: {0}")]
    Tls(String),
}

/// Class of an operational failure, as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Unreachable,
    AuthRejected,
    DatabaseNotFound,
    Rejected,
    Timeout,
    Other,
}

impl ConnectionError {
    /// Failure class for operational errors; `None` for faults that must propagate.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ConnectionError::Unreachable(_) => Some(FailureKind::Unreachable),
            ConnectionError::AuthRejected(_) => Some(FailureKind::AuthRejected),
            ConnectionError::DatabaseNotFound(_) => Some(FailureKind::DatabaseNotFound),
            ConnectionError::Rejected(_) => Some(FailureKind::Rejected),
            ConnectionError::Timeout(_) => Some(FailureKind::Timeout),
            ConnectionError::Failed(_) => Some(FailureKind::Other),
            ConnectionError::Tls(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnectionError>;

/// Render an error with its whole `source()` chain, joined by `": "`.
///
/// tokio-postgres only names the error kind in `Display` ("db error"); the
/// server message or OS error lives in the cause.
pub fn describe_error(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let part = inner.to_string();
        if !part.is_empty() && !text.contains(&part) {
            text.push_str(": ");
            text.push_str(&part);
        }
        cause = inner.source();
    }
    text
}
