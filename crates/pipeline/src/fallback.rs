//! Deterministic edit synthesis used when the model path yields nothing.

use acore::FileEdit;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static NAMED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:file|named?)\s+(?:named?\s+)?["']?([\w\-.]+)"#).unwrap());

static CREATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:create|add)\s+["']?([\w\-]+\.\w+)"#).unwrap());

/// The file the prompt names, if any. A name without an extension gets
/// `.txt`.
pub fn named_file(prompt: &str) -> Option<String> {
    let lower = prompt.to_lowercase();
    let name = NAMED
        .captures(&lower)
        .or_else(|| CREATED.captures(&lower))?
        .get(1)?
        .as_str()
        .trim_end_matches('.');
    if name.is_empty() {
        return None;
    }
    Some(if name.contains('.') {
        name.to_owned()
    } else {
        format!("{name}.txt")
    })
}

/// A single trivial edit derived from the prompt.
///
/// Two calls with the same prompt differ only in the timestamp.
pub fn fallback_edit(prompt: &str, now: DateTime<Utc>) -> FileEdit {
    match named_file(prompt) {
        Some(name) => FileEdit::create(
            name.clone(),
            format!("# {name}\n\nCreated by Amadeus Pocket 🎭\n\nPrompt: {prompt}\n"),
        ),
        None => FileEdit::create(
            format!("amadeus_change_{}.md", now.format("%Y%m%d_%H%M%S")),
            format!("# Change Request\n\n**Prompt:** {prompt}\n\n*Generated by Amadeus Pocket*\n"),
        ),
    }
}
