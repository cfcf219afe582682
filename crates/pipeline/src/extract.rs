//! Streaming edit extraction.
//!
//! [`Extractor`] accumulates model fragments and reports file paths as
//! they appear. The scan is advisory: only the newly appended fragment is
//! searched, so a path split across fragments may go unreported. The
//! edits themselves come from [`parse`] over the complete buffer.

use acore::{EditAction, EditSet, FileEdit};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""path"\s*:\s*"([^"]+)""#).unwrap());

/// Accumulates streamed fragments and discovers file paths.
#[derive(Debug, Default)]
pub struct Extractor {
    buffer: String,
    files: Vec<String>,
}

impl Extractor {
    /// Create an empty extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment, returning the paths it newly revealed in order.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);
        let mut found = Vec::new();
        for captures in PATH.captures_iter(fragment) {
            let path = &captures[1];
            if !self.files.iter().any(|f| f == path) {
                self.files.push(path.to_owned());
                found.push(path.to_owned());
            }
        }
        found
    }

    /// Every path discovered so far, in discovery order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// The accumulated response.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

/// The response could not be read as an edit set.
#[derive(Debug, thiserror::Error)]
#[error("malformed model output: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// The two accepted document shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Legacy(Vec<Value>),
    Canonical {
        #[serde(default)]
        summary: Value,
        #[serde(default)]
        next_steps: Value,
        files: Option<Value>,
        #[serde(flatten)]
        rest: serde_json::Map<String, Value>,
    },
}

/// One file entry. Anything without both `path` and `content` is dropped.
#[derive(Deserialize)]
struct Entry {
    path: String,
    content: String,
    #[serde(default)]
    action: Option<String>,
}

/// Follow-up steps: a list keeps its strings, a lone string is one step,
/// anything else is none.
fn steps(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(step) if !step.trim().is_empty() => Some(step),
                _ => None,
            })
            .collect(),
        Value::String(step) if !step.trim().is_empty() => vec![step],
        _ => Vec::new(),
    }
}

/// Remove an enclosing code fence.
pub fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }
    let body = text.split_once('\n').map_or("", |(_, rest)| rest);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a complete response into an edit set.
///
/// Accepts `{summary, next_steps, files}`, a bare list of file entries,
/// or a single file object. `delete` entries are ignored.
pub fn parse(text: &str) -> Result<EditSet, ParseError> {
    let document: Document = serde_json::from_str(strip_fence(text))?;
    let (summary, follow_ups, entries) = match document {
        Document::Legacy(files) => (None, Vec::new(), files),
        Document::Canonical {
            summary,
            next_steps,
            files,
            rest,
        } => {
            let entries = match files {
                Some(Value::Array(files)) => files,
                Some(file) => vec![file],
                None => vec![Value::Object(rest)],
            };
            (summary.as_str().map(str::to_owned), steps(next_steps), entries)
        }
    };

    let edits = entries
        .into_iter()
        .filter_map(|value| serde_json::from_value::<Entry>(value).ok())
        .filter_map(|entry| {
            let action = match entry.action.as_deref().map(str::to_ascii_lowercase) {
                Some(a) if a == "delete" => return None,
                Some(a) if a == "update" => EditAction::Update,
                _ => EditAction::Create,
            };
            Some(FileEdit {
                path: entry.path,
                content: entry.content,
                action,
            })
        })
        .collect();

    Ok(EditSet {
        summary: summary.filter(|s| !s.trim().is_empty()),
        follow_ups,
        edits,
    })
}
