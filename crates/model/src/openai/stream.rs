//! SSE chunk decoding for the chat completions API.

use crate::sse::Frame;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Chunk {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Decode one `data:` payload. `[DONE]` ends the stream.
pub fn decode(data: &str) -> Frame {
    if data.trim() == "[DONE]" {
        return Frame::End;
    }
    match serde_json::from_str::<Chunk>(data) {
        Ok(Chunk {
            error: Some(error), ..
        }) => Frame::Error(error.message),
        Ok(chunk) => match chunk.choices.into_iter().next().and_then(|c| c.delta.content) {
            Some(text) if !text.is_empty() => Frame::Text(text),
            _ => Frame::Skip,
        },
        Err(e) => {
            tracing::warn!("failed to parse openai chunk: {e}, data: {data}");
            Frame::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_content_is_forwarded() {
        let data = r#"{"id":"c1","object":"chat.completion.chunk","choices":[{"index":0,"delta":{"content":"\"path\""}}]}"#;
        assert_eq!(decode(data), Frame::Text("\"path\"".into()));
    }

    #[test]
    fn role_only_and_empty_deltas_are_skipped() {
        assert_eq!(
            decode(r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#),
            Frame::Skip
        );
        assert_eq!(
            decode(r#"{"choices":[{"index":0,"delta":{"content":""},"finish_reason":"stop"}]}"#),
            Frame::Skip
        );
        assert_eq!(decode(r#"{"choices":[]}"#), Frame::Skip);
    }

    #[test]
    fn done_and_error() {
        assert_eq!(decode("[DONE]"), Frame::End);
        assert_eq!(
            decode(r#"{"error":{"message":"rate limited","type":"requests"}}"#),
            Frame::Error("rate limited".into())
        );
    }
}
