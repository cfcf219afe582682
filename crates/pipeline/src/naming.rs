//! Branch names, change-request titles and bodies, commit messages.

use acore::{EditAction, FileEdit};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]+\b").unwrap());

/// Slug of the first three lowercase words longer than three letters,
/// or `update`.
pub fn slug(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    let words: Vec<&str> = WORD
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.len() > 3)
        .take(3)
        .collect();
    if words.is_empty() {
        "update".into()
    } else {
        words.join("-")
    }
}

/// `{prefix}/{slug}-{MMDDHHMM}-{suffix:04x}`.
pub fn branch_name(prefix: &str, prompt: &str, now: DateTime<Utc>, suffix: u16) -> String {
    format!(
        "{}/{}-{}-{suffix:04x}",
        prefix.trim_end_matches('/'),
        slug(prompt),
        now.format("%m%d%H%M")
    )
}

/// `🤖 ` followed by the first 60 characters of the prompt.
pub fn change_request_title(prompt: &str) -> String {
    let mut title: String = prompt.chars().take(60).collect();
    if prompt.chars().count() > 60 {
        title.push_str("...");
    }
    format!("🤖 {title}")
}

/// Markdown body listing the prompt, changed files and a review checklist.
pub fn change_request_body(prompt: &str, changed: &[String]) -> String {
    let files = changed
        .iter()
        .map(|path| format!("- `{path}`"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "## 🤖 AI-Generated Changes\n\n\
         **Prompt:**\n> {prompt}\n\n\
         ### Changed Files\n{files}\n\n\
         ### How to Review\n\
         1. Check the changed files above\n\
         2. Review the diff for correctness\n\
         3. Test locally if needed\n\
         4. Approve and merge!\n\n\
         ---\n\
         *This PR was automatically generated by [Amadeus Pocket](https://amadeus.dev) 🎭*\n"
    )
}

/// `{Create|Update} {path}`, the verb taken from whether the file exists.
pub fn commit_message(edit: &FileEdit, exists: bool) -> String {
    let action = if exists {
        EditAction::Update
    } else {
        EditAction::Create
    };
    format!("{} {}", action.verb(), edit.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn branch_name_uses_significant_words() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 9, 5, 0).unwrap();
        assert_eq!(
            branch_name("amadeus", "Add a healthcheck endpoint to the API", now, 0xab12),
            "amadeus/healthcheck-endpoint-01010905-ab12"
        );
        assert_eq!(branch_name("amadeus/", "fix it", now, 1), "amadeus/update-01010905-0001");
    }

    #[test]
    fn title_truncates_by_chars() {
        assert_eq!(change_request_title("add docs"), "🤖 add docs");
        let long = "é".repeat(70);
        let title = change_request_title(&long);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 2 + 60 + 3);
    }

    #[test]
    fn body_lists_files() {
        let body = change_request_body("add health", &["health.go".into(), "main.go".into()]);
        assert!(body.contains("> add health"));
        assert!(body.contains("- `health.go`\n- `main.go`"));
        assert!(body.contains("### How to Review"));
    }

    #[test]
    fn commit_message_follows_existence() {
        let edit = FileEdit::create("docs/a.md", "hi");
        assert_eq!(commit_message(&edit, false), "Create docs/a.md");
        assert_eq!(commit_message(&edit, true), "Update docs/a.md");
    }
}
