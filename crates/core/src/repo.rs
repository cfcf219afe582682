//! Repository-side value types.

use crate::{Error, Result};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Owner + name of a hosted repository. Immutable once resolved for a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Account or organisation owning the repository.
    pub owner: CompactString,
    /// Repository name.
    pub name: CompactString,
}

impl RepositoryRef {
    /// Create a reference from its parts.
    pub fn new(owner: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`, or a GitHub web or ssh remote URL.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().trim_end_matches('/').trim_end_matches(".git");
        let path = [
            "https://github.com/",
            "http://github.com/",
            "ssh://git@github.com/",
            "git@github.com:",
        ]
        .iter()
        .find_map(|prefix| normalized.strip_prefix(prefix))
        .unwrap_or(normalized);

        let mut parts = path.split('/');
        let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::configuration(format!(
                "invalid repository '{input}', expected owner/name"
            )));
        };
        let (owner, name) = (owner.trim(), name.trim());
        if owner.is_empty() || name.is_empty() {
            return Err(Error::configuration(format!(
                "invalid repository '{input}', expected owner/name"
            )));
        }
        Ok(Self::new(owner, name))
    }

    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Repository metadata returned by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    /// The resolved reference.
    pub repo: RepositoryRef,
    /// Branch that change requests target.
    pub default_branch: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Web URL of the repository.
    pub html_url: String,
    /// Optional description.
    pub description: Option<String>,
}

/// The working branch of a run.
///
/// Created fresh per run unless continuation is active, in which case the
/// existing branch is reused with `created_in_this_run = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
    /// Branch name.
    pub name: String,
    /// Head of the base branch when the run started.
    pub base_commit_sha: String,
    /// Whether this run created the branch.
    pub created_in_this_run: bool,
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A file (`blob`).
    #[serde(rename = "blob")]
    File,
    /// A directory (`tree`).
    #[serde(rename = "tree")]
    Directory,
    /// Submodules and anything else.
    #[serde(other)]
    Other,
}

/// One entry of a repository tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Repository-relative path.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// Current content of a file together with its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Decoded file body.
    pub content: String,
    /// Hash the host uses for optimistic concurrency on writes.
    pub hash: String,
}

/// A commit produced by a file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// Commit sha.
    pub sha: String,
    /// Web URL of the commit.
    pub url: String,
}

/// A change (pull/merge) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequestRef {
    /// Request number.
    pub number: u64,
    /// Web URL.
    pub url: String,
    /// Branch being merged.
    pub head_branch: String,
    /// Branch merged into.
    pub base_branch: String,
}

/// How a change request is merged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Merge commit.
    Merge,
    /// Squash into one commit.
    #[default]
    Squash,
    /// Rebase onto the base branch.
    Rebase,
}

impl MergeStrategy {
    /// The hosting API's name for the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            other => Err(Error::configuration(format!(
                "unknown merge strategy '{other}'"
            ))),
        }
    }
}

/// Active branch + request number for a user in continuation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    /// Head branch of the change request.
    pub branch: String,
    /// Change request number.
    pub number: u64,
}

impl Continuation {
    /// Create a continuation.
    pub fn new(branch: impl Into<String>, number: u64) -> Self {
        Self {
            branch: branch.into(),
            number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_urls() {
        let expected = RepositoryRef::new("octo", "hello");
        for input in [
            "octo/hello",
            "https://github.com/octo/hello",
            "https://github.com/octo/hello.git",
            "git@github.com:octo/hello.git",
            " octo/hello/ ",
        ] {
            assert_eq!(RepositoryRef::parse(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        for input in ["", "octo", "octo/", "/hello", "a/b/c"] {
            let err = RepositoryRef::parse(input).unwrap_err();
            assert_eq!(err.kind, crate::ErrorKind::Configuration, "{input}");
        }
    }
}
