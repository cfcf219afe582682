//! Events flowing from a run back to the front end.
//!
//! Two channels exist: coarse [`Progress`] at fixed checkpoints per step,
//! and fine-grained [`StreamEvent`]s while the model response streams in.

use serde::Serialize;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Credentials and repository selection checked.
    Init,
    /// Repository metadata fetched.
    ResolveRepo,
    /// Base branch head resolved.
    ResolveBaseRef,
    /// Fresh working branch created.
    ResolveBranch,
    /// Continuation branch reused.
    ReuseBranch,
    /// Tree listing fetched for model context.
    FetchTreeContext,
    /// Edits generated by the model or the fallback.
    GenerateEdits,
    /// Edits committed one by one.
    CommitEdits,
    /// New change request opened.
    CreateChangeRequest,
    /// Existing change request referenced.
    ReuseChangeRequest,
    /// Terminal.
    Done,
}

impl Step {
    /// Fixed progress checkpoint reported when the step begins.
    pub fn percentage(&self) -> u8 {
        match self {
            Self::Init => 0,
            Self::ResolveRepo => 10,
            Self::ResolveBaseRef => 20,
            Self::ResolveBranch | Self::ReuseBranch => 30,
            Self::FetchTreeContext => 40,
            Self::GenerateEdits => 50,
            Self::CommitEdits => 80,
            Self::CreateChangeRequest | Self::ReuseChangeRequest => 90,
            Self::Done => 100,
        }
    }
}

/// A coarse progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Current step.
    pub step: Step,
    /// Checkpoint on a 0-100 scale.
    pub percentage: u8,
    /// Short status line.
    pub message: String,
    /// Optional detail.
    pub detail: Option<String>,
}

impl Progress {
    /// A report at the step's own checkpoint.
    pub fn new(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            percentage: step.percentage(),
            message: message.into(),
            detail: None,
        }
    }

    /// Override the checkpoint.
    pub fn at(mut self, percentage: u8) -> Self {
        self.percentage = percentage.min(100);
        self
    }

    /// Attach a detail line.
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Fine-grained streaming events.
///
/// `Thinking` precedes any `FileDiscovered`; `Done` is last and fires
/// exactly once per model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The model accepted the request and is generating.
    Thinking,
    /// A new file path appeared in the stream.
    FileDiscovered {
        /// The newly discovered path.
        path: String,
        /// Every path discovered so far, in discovery order.
        files_so_far: Vec<String>,
    },
    /// The stream has ended.
    Done {
        /// Every path discovered during the stream.
        files_so_far: Vec<String>,
    },
}
