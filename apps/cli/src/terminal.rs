//! Terminal output for pipeline runs.

use acore::{Generation, Observer, PipelineResult, Progress, StreamEvent};
use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

/// Minimum gap between two printed file discoveries.
const DISCOVERY_INTERVAL: Duration = Duration::from_millis(750);

/// Prints progress to stdout, throttling file-discovery lines.
#[derive(Debug)]
pub struct TerminalObserver {
    interval: Duration,
    last_discovery: Mutex<Option<Instant>>,
}

impl Default for TerminalObserver {
    fn default() -> Self {
        Self::new(DISCOVERY_INTERVAL)
    }
}

impl TerminalObserver {
    /// Create an observer printing at most one discovery per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_discovery: Mutex::new(None),
        }
    }

    /// Whether a discovery at `now` should be printed.
    fn admit(&self, now: Instant) -> bool {
        let Ok(mut last) = self.last_discovery.lock() else {
            return true;
        };
        match *last {
            Some(at) if now.duration_since(at) < self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Observer for TerminalObserver {
    fn on_progress(&self, progress: &Progress) {
        println!("[{:>3}%] {}", progress.percentage, progress.message);
        if let Some(detail) = &progress.detail {
            println!("       {detail}");
        }
    }

    fn on_stream(&self, event: &StreamEvent) {
        match event {
            StreamEvent::Thinking => println!("       🧠 thinking..."),
            StreamEvent::FileDiscovered { path, files_so_far } => {
                if self.admit(Instant::now()) {
                    println!("       ✍️  {path} ({} so far)", files_so_far.len());
                }
            }
            StreamEvent::Done { files_so_far } => {
                println!("       ✨ {} file(s) written", files_so_far.len())
            }
        }
    }
}

/// Render the terminal result of a run.
pub fn render_result(result: &PipelineResult) -> String {
    let mut out = Vec::new();
    if result.success {
        out.push("✅ Changes pushed successfully!".to_owned());
    } else {
        let reason = result
            .error
            .as_ref()
            .map(|e| e.display_truncated(300))
            .unwrap_or_else(|| "unknown failure".into());
        out.push(format!("❌ {reason}"));
    }
    if let Some(branch) = &result.branch {
        out.push(format!("🌿 Branch: {branch}"));
    }
    for path in &result.committed_paths {
        out.push(format!("   • {path}"));
    }
    for failed in &result.failed {
        out.push(format!("   ⚠️ {} skipped ({}): {}", failed.path, failed.kind, failed.message));
    }
    if let Some(commit) = &result.commit {
        out.push(format!("🔗 Commit: {}", commit.url));
    }
    if let Some(request) = &result.change_request {
        out.push(format!("🔀 PR #{}: {}", request.number, request.url));
    }
    if let Some(Generation::Fallback { reason }) = &result.generation {
        out.push(format!("ℹ️  AI generation skipped: {reason}"));
    }
    if let Some(summary) = &result.summary {
        out.push(format!("\n📋 {summary}"));
    }
    if !result.follow_ups.is_empty() {
        out.push("👉 Next steps:".to_owned());
        for (i, step) in result.follow_ups.iter().enumerate() {
            out.push(format!("   {}. {step}", i + 1));
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discoveries_are_throttled() {
        let observer = TerminalObserver::new(Duration::from_secs(1));
        let start = Instant::now();
        assert!(observer.admit(start));
        assert!(!observer.admit(start + Duration::from_millis(400)));
        assert!(observer.admit(start + Duration::from_millis(1200)));
    }

    #[test]
    fn failure_shows_the_reason() {
        let result = PipelineResult::failed(acore::Error::configuration(
            "no repository access token configured",
        ));
        let text = render_result(&result);
        assert!(text.starts_with("❌ no repository access token configured"));
        assert!(!text.contains("Branch"));
    }
}
