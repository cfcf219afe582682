//! Request body for the Anthropic Messages API.

use crate::Request;
use serde::Serialize;

/// The request body for the Anthropic Messages API.
#[derive(Debug, Serialize)]
pub struct Body<'a> {
    /// The model identifier.
    pub model: &'a str,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// System prompt (top-level, not in messages array).
    #[serde(skip_serializing_if = "str::is_empty")]
    pub system: &'a str,
    /// The messages array.
    pub messages: [Message<'a>; 1],
    /// Whether to stream the response.
    pub stream: bool,
}

/// A single user message.
#[derive(Debug, Serialize)]
pub struct Message<'a> {
    /// Always `user`.
    pub role: &'static str,
    /// Message text.
    pub content: &'a str,
}

impl<'a> From<&'a Request> for Body<'a> {
    fn from(req: &'a Request) -> Self {
        Self {
            model: &req.model,
            max_tokens: req.max_tokens,
            system: &req.system,
            messages: [Message {
                role: "user",
                content: &req.user,
            }],
            stream: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_is_top_level() {
        let req = Request::new("claude-sonnet-4-20250514", "be terse", "add a readme")
            .with_max_tokens(512);
        let body = serde_json::to_value(Body::from(&req)).unwrap();
        assert_eq!(body["system"], "be terse");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "add a readme");
    }
}
