//! Shared Server-Sent Events transport for both providers.
//!
//! Buffers raw bytes, splits complete `\n\n`-terminated blocks off the
//! front, and hands each block's `data:` payload to a provider-specific
//! frame decoder. Only complete blocks are decoded, so a multi-byte
//! character split across network chunks is never mangled.

use anyhow::{Result, anyhow};
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::RequestBuilder;
use std::{fmt::Display, pin::pin, time::Duration};

/// What a provider makes of one SSE payload.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// A text fragment to forward.
    Text(String),
    /// Metadata, keep-alive or an empty delta.
    Skip,
    /// The provider's terminal marker.
    End,
    /// The provider reported an error mid-stream.
    Error(String),
}

/// Split complete blocks off the front of `buf`.
pub fn take_blocks(buf: &mut Vec<u8>) -> Vec<String> {
    let mut blocks = Vec::new();
    while let Some(pos) = buf.windows(2).position(|w| w == b"\n\n") {
        let block: Vec<u8> = buf.drain(..pos + 2).collect();
        blocks.push(String::from_utf8_lossy(&block[..pos]).into_owned());
    }
    blocks
}

/// The `data:` payload of a block, multi-line payloads joined by `\n`.
pub fn data(block: &str) -> Option<String> {
    let mut out: Option<String> = None;
    for line in block.lines() {
        let Some(rest) = line.strip_prefix("data:") else {
            continue;
        };
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        match out.as_mut() {
            Some(payload) => {
                payload.push('\n');
                payload.push_str(rest);
            }
            None => out = Some(rest.to_owned()),
        }
    }
    out
}

/// Send `request` and stream decoded text fragments.
///
/// `timeout` bounds the wait for response headers and every gap between
/// body chunks. A long generation that keeps sending is never cut off.
pub fn stream(
    request: RequestBuilder,
    provider: &'static str,
    decode: fn(&str) -> Frame,
    timeout: Duration,
) -> impl Stream<Item = Result<String>> + Send {
    try_stream! {
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .map_err(|_| anyhow!("{provider} did not respond within {}s", timeout.as_secs()))??;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            tracing::warn!("{provider} returned {status}: {snippet}");
            Err::<(), anyhow::Error>(anyhow!("{provider} returned {status}: {snippet}"))?;
        } else {
            for await fragment in frames(response.bytes_stream(), provider, decode, timeout) {
                yield fragment?;
            }
        }
    }
}

/// Decode a raw SSE body into text fragments.
///
/// A transport error, a provider error frame or `idle` without a chunk
/// ends the stream early with whatever was already yielded.
pub fn frames<S, B, E>(
    bytes: S,
    provider: &'static str,
    decode: fn(&str) -> Frame,
    idle: Duration,
) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
{
    try_stream! {
        let mut bytes = pin!(bytes);
        let mut buf = Vec::new();
        let mut clean = true;
        'read: loop {
            let chunk = match tokio::time::timeout(idle, bytes.next()).await {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(e))) => {
                    tracing::warn!("{provider} stream interrupted: {e}");
                    clean = false;
                    break;
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!("{provider} sent nothing for {}ms", idle.as_millis());
                    clean = false;
                    break;
                }
            };
            let chunk = chunk.as_ref();
            tracing::trace!("chunk: {}", String::from_utf8_lossy(chunk));
            buf.extend(chunk.iter().copied().filter(|b| *b != b'\r'));
            for block in take_blocks(&mut buf) {
                let Some(payload) = data(&block) else {
                    continue;
                };
                match decode(&payload) {
                    Frame::Text(text) => yield text,
                    Frame::Skip => {}
                    Frame::End => {
                        buf.clear();
                        break 'read;
                    }
                    Frame::Error(e) => {
                        tracing::warn!("{provider} reported a stream error: {e}");
                        clean = false;
                        break 'read;
                    }
                }
            }
        }

        // A final block without the trailing blank line.
        if clean && let Some(payload) = data(&String::from_utf8_lossy(&buf))
            && let Frame::Text(text) = decode(&payload)
        {
            yield text;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn splits_only_complete_blocks() {
        let mut buf = b"data: one\n\ndata: tw".to_vec();
        assert_eq!(take_blocks(&mut buf), vec!["data: one".to_owned()]);
        assert_eq!(buf, b"data: tw");
        buf.extend_from_slice(b"o\n\n");
        assert_eq!(take_blocks(&mut buf), vec!["data: two".to_owned()]);
        assert!(buf.is_empty());
    }

    #[test]
    fn keeps_multibyte_characters_split_across_chunks() {
        let text = "data: héllo\n\n".as_bytes();
        let (head, tail) = text.split_at(8);
        let mut buf = head.to_vec();
        assert!(take_blocks(&mut buf).is_empty());
        buf.extend_from_slice(tail);
        assert_eq!(take_blocks(&mut buf), vec!["data: héllo".to_owned()]);
    }

    #[test]
    fn data_reads_event_blocks() {
        assert_eq!(
            data("event: content_block_delta\ndata: {\"a\":1}").as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(data("data:x\ndata: y").as_deref(), Some("x\ny"));
        assert_eq!(data(": keep-alive"), None);
    }

    fn plain(payload: &str) -> Frame {
        match payload {
            "[DONE]" => Frame::End,
            "" => Frame::Skip,
            text => Frame::Text(text.to_owned()),
        }
    }

    fn event(word: &str) -> Result<Vec<u8>, Infallible> {
        Ok(format!("data: {word}\n\n").into_bytes())
    }

    #[tokio::test]
    async fn slow_body_outlives_the_idle_window() {
        let body = async_stream::stream! {
            for word in ["a", "b", "c", "d", "[DONE]"] {
                tokio::time::sleep(Duration::from_millis(40)).await;
                yield event(word);
            }
        };
        let out: Vec<String> = frames(body, "test", plain, Duration::from_millis(150))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(out, ["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn stalled_body_ends_after_the_idle_window() {
        let body = async_stream::stream! {
            yield event("a");
            std::future::pending::<()>().await;
        };
        let out: Vec<String> = frames(body, "test", plain, Duration::from_millis(50))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(out, ["a"]);
    }
}
