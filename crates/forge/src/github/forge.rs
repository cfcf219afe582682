//! `Forge` implementation for GitHub.

use super::{GitHub, api};
use crate::{
    ChangeRequest, ChangeRequestRef, CommitRef, Error, FileContent, FileWrite, Forge,
    MergeStrategy, NewChangeRequest, RepositoryMetadata, RepositoryRef, Result, TreeEntry,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Method;

impl Forge for GitHub {
    async fn resolve(&self, repo: &RepositoryRef) -> Result<RepositoryMetadata> {
        let url = self.repo_url(repo, &[])?;
        let raw: api::RepoResponse = self
            .json(self.client.request(Method::GET, url), "get repository")
            .await?;
        Ok(RepositoryMetadata {
            repo: RepositoryRef::new(raw.owner.login, raw.name),
            default_branch: raw.default_branch,
            private: raw.private,
            html_url: raw.html_url,
            description: raw.description,
        })
    }

    async fn head_sha(&self, repo: &RepositoryRef, branch: &str) -> Result<String> {
        let url = self.repo_url(repo, &["git/ref/heads", branch])?;
        let raw: api::RefResponse = self
            .json(self.client.request(Method::GET, url), "get branch")
            .await?;
        Ok(raw.object.sha)
    }

    async fn create_branch(&self, repo: &RepositoryRef, name: &str, from_sha: &str) -> Result<()> {
        let url = self.repo_url(repo, &["git/refs"])?;
        let body = api::CreateRef {
            reference: format!("refs/heads/{name}"),
            sha: from_sha,
        };
        self.send(
            self.client.request(Method::POST, url).json(&body),
            "create branch",
        )
        .await?;
        tracing::debug!("created branch {name} on {repo} at {from_sha}");
        Ok(())
    }

    async fn read_file(&self, repo: &RepositoryRef, path: &str, at_ref: &str) -> Result<FileContent> {
        let url = self.repo_url(repo, &["contents", path])?;
        let raw: api::ContentResponse = self
            .json(
                self.client
                    .request(Method::GET, url)
                    .query(&[("ref", at_ref)]),
                "read file",
            )
            .await?;
        Ok(FileContent {
            content: decode_content(&raw)?,
            hash: raw.sha,
        })
    }

    async fn write_file(&self, repo: &RepositoryRef, write: FileWrite<'_>) -> Result<CommitRef> {
        let url = self.repo_url(repo, &["contents", write.path])?;
        let body = api::PutContent {
            message: write.message,
            content: STANDARD.encode(write.content.as_bytes()),
            branch: write.branch,
            sha: write.expected_hash,
        };
        let raw: api::PutContentResponse = self
            .json(self.client.request(Method::PUT, url).json(&body), "write file")
            .await?;
        Ok(CommitRef {
            sha: raw.commit.sha,
            url: raw.commit.html_url,
        })
    }

    async fn list_tree(&self, repo: &RepositoryRef, at_ref: &str) -> Result<Vec<TreeEntry>> {
        let url = self.repo_url(repo, &["git/trees", at_ref])?;
        let raw: api::TreeResponse = self
            .json(
                self.client
                    .request(Method::GET, url)
                    .query(&[("recursive", "1")]),
                "list tree",
            )
            .await?;
        if raw.truncated {
            tracing::debug!("tree listing for {repo} at {at_ref} was truncated by the host");
        }
        Ok(raw.tree)
    }

    async fn create_change_request(
        &self,
        repo: &RepositoryRef,
        request: NewChangeRequest<'_>,
    ) -> Result<ChangeRequestRef> {
        let url = self.repo_url(repo, &["pulls"])?;
        let body = api::CreatePull {
            title: request.title,
            body: request.body,
            head: request.head,
            base: request.base,
        };
        let raw: api::PullResponse = self
            .json(
                self.client.request(Method::POST, url).json(&body),
                "create pull request",
            )
            .await?;
        Ok(into_ref(raw))
    }

    async fn get_change_request(&self, repo: &RepositoryRef, number: u64) -> Result<ChangeRequestRef> {
        let url = self.repo_url(repo, &["pulls", &number.to_string()])?;
        let raw: api::PullResponse = self
            .json(self.client.request(Method::GET, url), "get pull request")
            .await?;
        Ok(into_ref(raw))
    }

    async fn list_open_change_requests(&self, repo: &RepositoryRef) -> Result<Vec<ChangeRequest>> {
        let url = self.repo_url(repo, &["pulls"])?;
        let raw: Vec<api::PullResponse> = self
            .json(
                self.client.request(Method::GET, url).query(&[
                    ("state", "open"),
                    ("sort", "updated"),
                    ("direction", "desc"),
                    ("per_page", "30"),
                ]),
                "list pull requests",
            )
            .await?;
        Ok(raw
            .into_iter()
            .map(|pull| {
                let title = pull.title.clone();
                let updated_at = pull.updated_at.clone();
                ChangeRequest {
                    reference: into_ref(pull),
                    title,
                    updated_at,
                }
            })
            .collect())
    }

    async fn merge(&self, repo: &RepositoryRef, number: u64, strategy: MergeStrategy) -> Result<String> {
        let url = self.repo_url(repo, &["pulls", &number.to_string(), "merge"])?;
        let body = api::MergePull {
            merge_method: strategy.as_str(),
        };
        let raw: api::MergeResponse = self
            .json(
                self.client.request(Method::PUT, url).json(&body),
                "merge pull request",
            )
            .await
            .map_err(merge_error)?;
        Ok(if raw.message.is_empty() {
            format!("pull request #{number} merged")
        } else {
            raw.message
        })
    }

    fn change_request_url(&self, repo: &RepositoryRef, number: u64) -> String {
        format!("{}/{}/pull/{number}", self.web_url, repo.full_name())
    }
}

fn into_ref(raw: api::PullResponse) -> ChangeRequestRef {
    ChangeRequestRef {
        number: raw.number,
        url: raw.html_url,
        head_branch: raw.head.reference,
        base_branch: raw.base.reference,
    }
}

/// A 409 on merge means the head moved or the branch cannot be merged
/// cleanly, not a write conflict.
fn merge_error(error: Error) -> Error {
    match error {
        Error::Conflict(message) => Error::NotMergeable(message),
        other => other,
    }
}

/// Decode the base64 body of a contents response.
fn decode_content(raw: &api::ContentResponse) -> Result<String> {
    if let Some(encoding) = raw.encoding.as_deref()
        && encoding != "base64"
    {
        return Err(Error::Decode(format!("unsupported content encoding '{encoding}'")));
    }
    let packed: String = raw.content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(packed)
        .map_err(|e| Error::Decode(format!("file content: {e}")))?;
    String::from_utf8(bytes).map_err(|_| Error::Decode("file content is not utf-8".into()))
}
