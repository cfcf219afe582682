//! Repository gateway.
//!
//! A minimal typed client over the hosting API. Every method is a single
//! logical round trip that returns a typed value or a typed [`Error`];
//! nothing here holds state between calls.
//!
//! `create_branch` and `create_change_request` are not idempotent. Callers
//! must inspect [`Error::Conflict`] instead of retrying them blindly.

pub use acore::{
    ChangeRequestRef, CommitRef, FileContent, MergeStrategy, RepositoryMetadata, RepositoryRef,
    TreeEntry,
};
pub use error::{Error, Result};
pub use github::GitHub;

mod error;
pub mod github;

use std::future::Future;

/// A file write on a branch.
#[derive(Debug, Clone, Copy)]
pub struct FileWrite<'a> {
    /// Repository-relative path.
    pub path: &'a str,
    /// Full new body.
    pub content: &'a str,
    /// Target branch.
    pub branch: &'a str,
    /// Commit message.
    pub message: &'a str,
    /// Current content hash; a stale value fails with [`Error::Conflict`].
    /// `None` creates the file.
    pub expected_hash: Option<&'a str>,
}

/// A change request to open.
#[derive(Debug, Clone, Copy)]
pub struct NewChangeRequest<'a> {
    /// Title.
    pub title: &'a str,
    /// Markdown body.
    pub body: &'a str,
    /// Branch to merge.
    pub head: &'a str,
    /// Branch to merge into.
    pub base: &'a str,
}

/// An open change request as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Reference to the request.
    pub reference: ChangeRequestRef,
    /// Title.
    pub title: String,
    /// Last update, as reported by the host.
    pub updated_at: Option<String>,
}

/// Operations on a hosted repository.
pub trait Forge: Send + Sync {
    /// Fetch repository metadata.
    fn resolve(&self, repo: &RepositoryRef)
    -> impl Future<Output = Result<RepositoryMetadata>> + Send;

    /// Head commit sha of a branch.
    fn head_sha(&self, repo: &RepositoryRef, branch: &str)
    -> impl Future<Output = Result<String>> + Send;

    /// Create `name` pointing at `from_sha`. Fails with
    /// [`Error::Conflict`] if the branch exists.
    fn create_branch(
        &self,
        repo: &RepositoryRef,
        name: &str,
        from_sha: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Read a file and its content hash at a ref.
    fn read_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        at_ref: &str,
    ) -> impl Future<Output = Result<FileContent>> + Send;

    /// Create or replace a file, producing one commit.
    fn write_file(
        &self,
        repo: &RepositoryRef,
        write: FileWrite<'_>,
    ) -> impl Future<Output = Result<CommitRef>> + Send;

    /// Recursive tree listing at a ref, in host order.
    fn list_tree(
        &self,
        repo: &RepositoryRef,
        at_ref: &str,
    ) -> impl Future<Output = Result<Vec<TreeEntry>>> + Send;

    /// Open a change request.
    fn create_change_request(
        &self,
        repo: &RepositoryRef,
        request: NewChangeRequest<'_>,
    ) -> impl Future<Output = Result<ChangeRequestRef>> + Send;

    /// Fetch a change request by number.
    fn get_change_request(
        &self,
        repo: &RepositoryRef,
        number: u64,
    ) -> impl Future<Output = Result<ChangeRequestRef>> + Send;

    /// Open change requests, most recently updated first.
    fn list_open_change_requests(
        &self,
        repo: &RepositoryRef,
    ) -> impl Future<Output = Result<Vec<ChangeRequest>>> + Send;

    /// Merge a change request. Returns the host's message.
    fn merge(
        &self,
        repo: &RepositoryRef,
        number: u64,
        strategy: MergeStrategy,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Web URL of a change request, derived without a network call.
    fn change_request_url(&self, repo: &RepositoryRef, number: u64) -> String;
}
