//! Terminal failure taxonomy of a run.

use serde::Serialize;
use std::fmt;

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Machine-distinguishable kind of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No usable credential or repository selection. Detected before any
    /// network call.
    Configuration,
    /// Repository, branch, file or change request does not exist.
    NotFound,
    /// Optimistic-write conflict or duplicate branch/change request.
    Conflict,
    /// The token lacks permission for the operation.
    Forbidden,
    /// The change request cannot be merged.
    NotMergeable,
    /// Hosting or model API unreachable, timed out or returned 5xx.
    Upstream,
    /// Not a single edit could be committed.
    NoChanges,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::NotMergeable => "not mergeable",
            Self::Upstream => "upstream unavailable",
            Self::NoChanges => "no changes",
        };
        f.write_str(name)
    }
}

/// A failure carrying its kind and a message fit for direct display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    /// Failure kind.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub message: String,
}

impl Error {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// A not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// An upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    /// Whether the caller may retry with fresh state.
    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    /// The message truncated to `max` characters for chat display.
    pub fn display_truncated(&self, max: usize) -> String {
        if self.message.chars().count() <= max {
            return self.message.clone();
        }
        let mut out: String = self.message.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_chars() {
        let err = Error::upstream("héllo wörld");
        assert_eq!(err.display_truncated(64), "héllo wörld");
        assert_eq!(err.display_truncated(8), "héllo...");
    }
}
