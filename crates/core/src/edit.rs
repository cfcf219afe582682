//! File edits produced by a model call or the fallback synthesiser.

use serde::{Deserialize, Serialize};

/// Whether an edit creates a new file or replaces an existing one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    /// New file.
    #[default]
    Create,
    /// Replace an existing file.
    Update,
}

impl EditAction {
    /// Verb used in commit messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
        }
    }
}

/// One file edit. `content` is always the full new body, never a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEdit {
    /// Repository-relative path.
    pub path: String,
    /// Full new file body.
    pub content: String,
    /// Declared action.
    #[serde(default)]
    pub action: EditAction,
}

impl FileEdit {
    /// A `create` edit.
    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            action: EditAction::Create,
        }
    }
}

/// The structured result of one model call.
///
/// The order of `edits` is the commit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSet {
    /// Short explanation of the change.
    pub summary: Option<String>,
    /// Suggested next steps, in order.
    pub follow_ups: Vec<String>,
    /// File edits, in commit order.
    pub edits: Vec<FileEdit>,
}

impl EditSet {
    /// Whether the set carries no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
