//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Limits and naming for a run. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prefix of working branch names, also used to find continuable
    /// change requests.
    pub branch_prefix: String,
    /// Tree entries handed to the model.
    pub tree_context_limit: usize,
    /// History turns handed to the model.
    pub history_limit: usize,
    /// Characters kept per history turn.
    pub history_message_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            branch_prefix: "amadeus".into(),
            tree_context_limit: 100,
            history_limit: 10,
            history_message_chars: 500,
        }
    }
}
