//! SSE event decoding for the Anthropic streaming Messages API.
//!
//! Anthropic streaming events differ from OpenAI's format:
//! - `message_start`: initial message metadata
//! - `content_block_start`: begin a content block
//! - `content_block_delta`: incremental content (`text_delta`)
//! - `content_block_stop`: end of a content block
//! - `message_delta`: final stop reason and usage
//! - `message_stop`: end of message
//! - `error`: the provider gave up mid-stream

use crate::sse::Frame;
use serde::Deserialize;

/// A raw SSE event from the Anthropic streaming API.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Event {
    /// Incremental content within a block.
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { delta: BlockDelta },
    /// End of message.
    #[serde(rename = "message_stop")]
    MessageStop,
    /// Mid-stream failure.
    #[serde(rename = "error")]
    Error { error: ErrorBody },
    /// Everything else (message_start, ping, ...).
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum BlockDelta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Decode one `data:` payload.
pub fn decode(data: &str) -> Frame {
    match serde_json::from_str::<Event>(data) {
        Ok(Event::ContentBlockDelta {
            delta: BlockDelta::TextDelta { text },
        }) if !text.is_empty() => Frame::Text(text),
        Ok(Event::MessageStop) => Frame::End,
        Ok(Event::Error { error }) => Frame::Error(error.message),
        Ok(_) => Frame::Skip,
        Err(e) => {
            tracing::warn!("failed to parse anthropic event: {e}, data: {data}");
            Frame::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_delta_is_forwarded() {
        let data = r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"{\"files\""}}"#;
        assert_eq!(decode(data), Frame::Text("{\"files\"".into()));
    }

    #[test]
    fn control_events() {
        assert_eq!(decode(r#"{"type":"message_stop"}"#), Frame::End);
        assert_eq!(decode(r#"{"type":"ping"}"#), Frame::Skip);
        assert_eq!(
            decode(r#"{"type":"message_start","message":{"id":"m","model":"c"}}"#),
            Frame::Skip
        );
        assert_eq!(
            decode(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#),
            Frame::Error("Overloaded".into())
        );
        assert_eq!(decode("not json"), Frame::Skip);
    }
}
