//! Gateway errors.

use acore::ErrorKind;
use reqwest::StatusCode;

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A failed repository API call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Repository, ref, file or request does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Name already taken or content hash stale.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The change request cannot be merged.
    #[error("not mergeable: {0}")]
    NotMergeable(String),
    /// Token lacks permission.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Token rejected or unusable.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Any other non-success status.
    #[error("upstream returned {status}: {message}")]
    Upstream {
        /// HTTP status.
        status: u16,
        /// Host message.
        message: String,
    },
    /// Connection failure or timeout.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    /// The host answered with something unexpected.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl Error {
    /// Map a non-success status to an error.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::METHOD_NOT_ALLOWED => Self::NotMergeable(message),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Self::Conflict(message),
            _ => Self::Upstream {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// The pipeline-level kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotMergeable(_) => ErrorKind::NotMergeable,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Unauthorized(_) => ErrorKind::Configuration,
            Self::Upstream { .. } | Self::Transport(_) | Self::Decode(_) => ErrorKind::Upstream,
        }
    }

    /// Whether this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<Error> for acore::Error {
    fn from(e: Error) -> Self {
        acore::Error::new(e.kind(), e.to_string())
    }
}
