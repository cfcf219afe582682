//! Prompt assembly.

use crate::PipelineConfig;
use acore::{EntryKind, TreeEntry, Turn};

/// System prompt sent with every generation request.
pub const SYSTEM_PROMPT: &str = r#"You are an expert coding assistant. You will be given a repository context and a user request.

Your task is to generate file changes to fulfill the user's request.

IMPORTANT: You MUST respond with ONLY a valid JSON object (not an array). No explanations, no markdown.

The JSON object must have this structure:
{
  "summary": "Brief explanation of what you did (1-2 sentences)",
  "next_steps": ["Step 1 the user should do next", "Step 2", ...],
  "files": [
    {"path": "src/main.py", "content": "file content here", "action": "create"}
  ]
}

Rules for files array:
- "path": the file path (e.g., "src/main.py")
- "content": the complete file content
- "action": either "create" for new files or "update" for existing files

For updates, include the FULL new file content, not just the changes.
Keep summary concise. next_steps should be 1-3 actionable items.

You may reference previous conversation context if provided to understand the full request."#;

/// One line per entry, directories marked 📁 and everything else 📄.
pub fn render_tree(tree: &[TreeEntry], limit: usize) -> String {
    tree.iter()
        .take(limit)
        .map(|entry| {
            let marker = match entry.kind {
                EntryKind::Directory => "📁",
                _ => "📄",
            };
            format!("{marker} {}", entry.path)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The last `limit` turns, each cut to `max_chars` characters.
pub fn render_history(history: &[Turn], limit: usize, max_chars: usize) -> String {
    let start = history.len().saturating_sub(limit);
    history[start..]
        .iter()
        .map(|turn| {
            let content: String = turn.content.chars().take(max_chars).collect();
            format!("{}: {content}", turn.role.label())
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// The user message: tree, optional history, then the request.
pub fn user_message(
    prompt: &str,
    tree: &[TreeEntry],
    history: &[Turn],
    config: &PipelineConfig,
) -> String {
    let tree = render_tree(tree, config.tree_context_limit);
    let history = if history.is_empty() || config.history_limit == 0 {
        String::new()
    } else {
        format!(
            "\n\n## Previous Conversation:\n{}",
            render_history(history, config.history_limit, config.history_message_chars)
        )
    };
    format!(
        "## Repository Structure:\n{tree}\n{history}\n\n## Current Request:\n{prompt}\n\n\
         Generate the file changes needed. Respond with ONLY a JSON object with summary, \
         next_steps, and files."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, kind: EntryKind) -> TreeEntry {
        TreeEntry {
            path: path.into(),
            kind,
        }
    }

    #[test]
    fn tree_is_limited_and_marked() {
        let tree = vec![
            entry("src", EntryKind::Directory),
            entry("src/main.go", EntryKind::File),
            entry("vendor", EntryKind::Other),
        ];
        assert_eq!(render_tree(&tree, 2), "📁 src\n📄 src/main.go");
    }

    #[test]
    fn history_keeps_the_tail() {
        let history: Vec<Turn> = (0..12)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("q{i}"))
                } else {
                    Turn::assistant(format!("a{i}"))
                }
            })
            .collect();
        let rendered = render_history(&history, 10, 500);
        assert!(rendered.starts_with("User: q2\n---\nAssistant: a3"));
        assert!(rendered.ends_with("Assistant: a11"));
        assert_eq!(rendered.matches("---").count(), 9);
    }

    #[test]
    fn history_turns_are_truncated_by_chars() {
        let history = vec![Turn::user("é".repeat(600))];
        let rendered = render_history(&history, 10, 500);
        assert_eq!(rendered.chars().count(), "User: ".len() + 500);
    }

    #[test]
    fn user_message_omits_empty_history() {
        let config = PipelineConfig::default();
        let message = user_message("add a readme", &[], &[], &config);
        assert!(!message.contains("Previous Conversation"));
        assert!(message.contains("## Current Request:\nadd a readme"));

        let message = user_message("again", &[], &[Turn::user("first")], &config);
        assert!(message.contains("## Previous Conversation:\nUser: first"));
    }
}
