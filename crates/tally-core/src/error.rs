//! Shared error type across tally crates.
//!
//! The metrics engine itself never fails; this type covers the edges around it
//! (configuration, startup I/O).

use thiserror::Error;

/// Stable error codes surfaced to operators and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ClientCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TallyError>;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TallyError {
    pub fn client_code(&self) -> ClientCode {
        match self {
            TallyError::BadRequest(_) => ClientCode::BadRequest,
            TallyError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            TallyError::Internal(_) => ClientCode::Internal,
        }
    }
}

impl From<std::io::Error> for TallyError {
    fn from(e: std::io::Error) -> Self {
        TallyError::Internal(e.to_string())
    }
}
