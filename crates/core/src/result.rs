//! The terminal value of a run.

use crate::{ChangeRequestRef, CommitRef, Error, ErrorKind};
use compact_str::CompactString;
use serde::Serialize;
use std::fmt;

/// An edit that could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEdit {
    /// Path of the edit.
    pub path: String,
    /// Why it failed.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub message: String,
}

/// How the committed edits were produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Generation {
    /// Edits came from a model call.
    Model {
        /// Provider family used.
        provider: CompactString,
        /// Model id sent to the provider.
        model: CompactString,
        /// Whether the requested model was swapped for the other
        /// provider's default.
        substituted: bool,
    },
    /// Edits were synthesised from the prompt.
    Fallback {
        /// Why the model path was not used.
        reason: String,
    },
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model {
                provider,
                model,
                substituted,
            } => {
                write!(f, "{provider} {model}")?;
                if *substituted {
                    f.write_str(" (substituted)")?;
                }
                Ok(())
            }
            Self::Fallback { reason } => write!(f, "fallback: {reason}"),
        }
    }
}

/// Terminal value of a run.
///
/// `success` holds exactly when `committed_paths` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    /// Whether at least one edit was committed.
    pub success: bool,
    /// Working branch, once resolved.
    pub branch: Option<String>,
    /// Committed paths, in commit order.
    pub committed_paths: Vec<String>,
    /// Edits that were skipped.
    pub failed: Vec<FailedEdit>,
    /// Last commit made.
    pub commit: Option<CommitRef>,
    /// New or reused change request.
    pub change_request: Option<ChangeRequestRef>,
    /// Model summary, if any.
    pub summary: Option<String>,
    /// Model follow-up suggestions.
    pub follow_ups: Vec<String>,
    /// How the edits were produced, once known.
    pub generation: Option<Generation>,
    /// Terminal failure.
    pub error: Option<Error>,
}

impl PipelineResult {
    /// A terminal failure before or during the run.
    pub fn failed(error: Error) -> Self {
        Self {
            success: false,
            branch: None,
            committed_paths: Vec::new(),
            failed: Vec::new(),
            commit: None,
            change_request: None,
            summary: None,
            follow_ups: Vec::new(),
            generation: None,
            error: Some(error),
        }
    }

    /// A run that reached the commit step.
    ///
    /// Becomes a `NoChanges` failure when nothing was committed.
    pub fn committed(
        branch: String,
        committed_paths: Vec<String>,
        failed: Vec<FailedEdit>,
        commit: Option<CommitRef>,
    ) -> Self {
        let success = !committed_paths.is_empty();
        let error = (!success).then(|| {
            Error::new(
                ErrorKind::NoChanges,
                match failed.first() {
                    Some(first) => format!("no files could be committed: {}", first.message),
                    None => "no files could be committed".to_owned(),
                },
            )
        });
        Self {
            success,
            branch: Some(branch),
            committed_paths,
            failed,
            commit,
            change_request: None,
            summary: None,
            follow_ups: Vec::new(),
            generation: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_display() {
        let model = Generation::Model {
            provider: "openai".into(),
            model: "gpt-5.2".into(),
            substituted: true,
        };
        assert_eq!(model.to_string(), "openai gpt-5.2 (substituted)");
        let fallback = Generation::Fallback {
            reason: "cancelled".into(),
        };
        assert_eq!(fallback.to_string(), "fallback: cancelled");
    }

    #[test]
    fn success_tracks_committed_paths() {
        let ok = PipelineResult::committed("b".into(), vec!["a.md".into()], vec![], None);
        assert!(ok.success);
        assert!(ok.error.is_none());

        let failed = vec![FailedEdit {
            path: "a.md".into(),
            kind: ErrorKind::Conflict,
            message: "stale hash".into(),
        }];
        let none = PipelineResult::committed("b".into(), vec![], failed, None);
        assert!(!none.success);
        let error = none.error.unwrap();
        assert_eq!(error.kind, ErrorKind::NoChanges);
        assert!(error.message.contains("stale hash"));
    }
}
