//! Model gateway configuration.

use crate::{Request, claude, openai};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints, defaults and limits for the model gateway.
///
/// Every field has a default, so an empty `[models]` table is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model requested when the user has no preference.
    pub default: CompactString,
    /// Substitute used when an OpenAI-style model falls back to Anthropic.
    pub anthropic_default: CompactString,
    /// Substitute used when a Claude model falls back to OpenAI.
    pub openai_default: CompactString,
    /// Anthropic Messages endpoint.
    pub anthropic_url: String,
    /// OpenAI chat completions endpoint.
    pub openai_url: String,
    /// Timeout for one streamed call, in seconds.
    pub timeout_secs: u64,
    /// Timeout for opus-family models, in seconds.
    pub slow_timeout_secs: u64,
    /// Completion token budget.
    pub max_tokens: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default: "gpt-5.2".into(),
            anthropic_default: "claude-sonnet-4-20250514".into(),
            openai_default: "gpt-5.2".into(),
            anthropic_url: claude::ENDPOINT.to_owned(),
            openai_url: openai::ENDPOINT.to_owned(),
            timeout_secs: 180,
            slow_timeout_secs: 300,
            max_tokens: crate::request::DEFAULT_MAX_TOKENS,
        }
    }
}

impl ModelConfig {
    /// Timeout for a model id.
    pub fn timeout_for(&self, model: &str) -> Duration {
        if model.contains("opus") {
            Duration::from_secs(self.slow_timeout_secs)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Build a request for `model` with the configured budget and timeout.
    pub fn request(&self, model: &str, system: &str, user: &str) -> Request {
        Request::new(model, system, user)
            .with_max_tokens(self.max_tokens)
            .with_timeout(self.timeout_for(model))
    }
}
