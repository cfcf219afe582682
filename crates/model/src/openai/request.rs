//! Request body for the OpenAI chat completions API.

use crate::Request;
use serde::Serialize;

/// The request body for the chat completions API.
#[derive(Debug, Serialize)]
pub struct Body<'a> {
    /// The model identifier.
    pub model: &'a str,
    /// System then user message.
    pub messages: Vec<Message<'a>>,
    /// Budget for reasoning-era models (`gpt-5*`, `o1*`, `o3*`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<usize>,
    /// Budget for every other model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    /// Whether to stream the response.
    pub stream: bool,
}

/// A chat message.
#[derive(Debug, Serialize)]
pub struct Message<'a> {
    /// `system` or `user`.
    pub role: &'static str,
    /// Message text.
    pub content: &'a str,
}

/// Whether `model` takes `max_completion_tokens` instead of `max_tokens`.
pub fn uses_completion_tokens(model: &str) -> bool {
    let model = model.to_ascii_lowercase();
    ["gpt-5", "o1", "o3"].iter().any(|p| model.starts_with(p))
}

impl<'a> From<&'a Request> for Body<'a> {
    fn from(req: &'a Request) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !req.system.is_empty() {
            messages.push(Message {
                role: "system",
                content: &req.system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &req.user,
        });

        let (max_completion_tokens, max_tokens) = if uses_completion_tokens(&req.model) {
            (Some(req.max_tokens), None)
        } else {
            (None, Some(req.max_tokens))
        };

        Self {
            model: &req.model,
            messages,
            max_completion_tokens,
            max_tokens,
            stream: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_field_follows_model_family() {
        let req = Request::new("gpt-5.2", "sys", "hi").with_max_tokens(100);
        let body = serde_json::to_value(Body::from(&req)).unwrap();
        assert_eq!(body["max_completion_tokens"], 100);
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["stream"], true);

        let req = Request::new("gpt-4o", "sys", "hi").with_max_tokens(100);
        let body = serde_json::to_value(Body::from(&req)).unwrap();
        assert_eq!(body["max_tokens"], 100);
        assert!(body.get("max_completion_tokens").is_none());
    }

    #[test]
    fn reasoning_prefixes() {
        assert!(uses_completion_tokens("o1-mini"));
        assert!(uses_completion_tokens("o3"));
        assert!(uses_completion_tokens("GPT-5"));
        assert!(!uses_completion_tokens("gpt-4.1"));
    }
}
