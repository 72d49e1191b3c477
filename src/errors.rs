//!
//! src/errors.rs  Andrew Belles  Oct 19th, 2026
//!
//! Defines enums and methods of error conversion
//! for errors the admin client uses
//!
//!

use thiserror::Error;

/// Coarse classification the view layer uses to decide how to surface
/// a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Status,
    Malformed,
    Local
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("config error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("pagination error: {0}")]
    Pagination(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl AdminError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AdminError::Transport(_) => FailureKind::Transport,
            AdminError::Status { .. } => FailureKind::Status,
            AdminError::Parse(_) | AdminError::Pagination(_) => FailureKind::Malformed,
            AdminError::Config(_) | AdminError::State(_) | AdminError::Io(_) =>
                FailureKind::Local
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AdminError::Parse(e.to_string())
        } else {
            AdminError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(e: serde_json::Error) -> Self { AdminError::Parse(e.to_string()) }
}

impl From<url::ParseError> for AdminError {
    fn from(e: url::ParseError) -> Self { AdminError::Parse(format!("url: {e}")) }
}
