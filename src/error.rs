//! Error taxonomy for note persistence.
//!
//! DESIGN
//! ======
//! Conditions with a neutral reading (key never written, picker dismissed)
//! are absorbed inside the adapters and never become a `NotesError`.
//! Everything else reaches the caller unchanged in meaning; the core never
//! retries. `ErrorCode` gives the UI a stable code and a retry hint.

use crate::files::FileIoError;
use crate::host::HostError;

/// Errors surfaced by `save` / `load`.
#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    /// The host refused the request because one of its limits was hit
    /// (value size, storage quota, request rate, key shape).
    #[error("host storage limit: {0}")]
    HostQuotaOrRate(String),

    /// The host or the path to it failed transiently.
    #[error("host storage unavailable: {0}")]
    TransientHost(String),

    /// The host does not support the requested operation.
    #[error("host storage rejected request: {0}")]
    HostRejected(String),

    /// Loaded text is not a `{content, saved}` envelope.
    #[error("malformed note envelope: {0}")]
    MalformedEnvelope(String),

    /// The download or file read failed.
    #[error("file transfer failed: {0}")]
    FileIo(#[from] FileIoError),

    /// The envelope could not be encoded.
    #[error("note serialization failed: {0}")]
    Serialize(String),

    /// `NotesConfig` failed validation.
    #[error("invalid notes config: {0}")]
    Config(String),
}

impl From<HostError> for NotesError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Quota(msg) | HostError::RateLimited(msg) | HostError::InvalidKey(msg) => {
                Self::HostQuotaOrRate(msg)
            }
            HostError::Unavailable(msg) => Self::TransientHost(msg),
            HostError::NotFound(key) => Self::HostRejected(format!("key not found: {key}")),
            HostError::Unsupported(op) => Self::HostRejected(format!("operation not supported: {op}")),
        }
    }
}

/// Stable machine-readable classification for UI presentation.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

impl ErrorCode for NotesError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::HostQuotaOrRate(_) => "E_HOST_LIMIT",
            Self::TransientHost(_) => "E_HOST_TRANSIENT",
            Self::HostRejected(_) => "E_HOST_REJECTED",
            Self::MalformedEnvelope(_) => "E_MALFORMED_ENVELOPE",
            Self::FileIo(_) => "E_FILE_IO",
            Self::Serialize(_) => "E_SERIALIZE",
            Self::Config(_) => "E_CONFIG",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::TransientHost(_))
    }
}

pub type NotesResult<T> = Result<T, NotesError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
