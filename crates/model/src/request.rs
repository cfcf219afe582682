//! Provider-independent request.

use compact_str::CompactString;
use std::time::Duration;

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: usize = 16384;

/// Default timeout for one streamed call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// One system/user prompt pair sent to a model.
#[derive(Debug, Clone)]
pub struct Request {
    /// Model id sent to the provider.
    pub model: CompactString,
    /// System prompt.
    pub system: String,
    /// User prompt.
    pub user: String,
    /// Completion token budget.
    pub max_tokens: usize,
    /// Timeout covering connect through the end of the body.
    pub timeout: Duration,
}

impl Request {
    /// Create a request with default budget and timeout.
    pub fn new(
        model: impl Into<CompactString>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the completion budget.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
