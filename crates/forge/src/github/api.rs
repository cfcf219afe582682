//! Wire shapes of the GitHub REST API.

use acore::TreeEntry;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Deserialize)]
pub struct RepoResponse {
    pub name: String,
    pub owner: Owner,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub html_url: String,
    pub description: Option<String>,
}

fn default_branch() -> String {
    "main".to_owned()
}

#[derive(Deserialize)]
pub struct GitObject {
    pub sha: String,
}

#[derive(Deserialize)]
pub struct RefResponse {
    pub object: GitObject,
}

#[derive(Serialize)]
pub struct CreateRef<'a> {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: &'a str,
}

#[derive(Deserialize)]
pub struct ContentResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
    pub sha: String,
}

#[derive(Serialize)]
pub struct PutContent<'a> {
    pub message: &'a str,
    pub content: String,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Deserialize)]
pub struct CommitBody {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Deserialize)]
pub struct PutContentResponse {
    pub commit: CommitBody,
}

#[derive(Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Serialize)]
pub struct CreatePull<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

#[derive(Deserialize)]
pub struct PullRef {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Deserialize)]
pub struct PullResponse {
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub title: String,
    pub head: PullRef,
    pub base: PullRef,
    pub updated_at: Option<String>,
}

#[derive(Serialize)]
pub struct MergePull<'a> {
    pub merge_method: &'a str,
}

#[derive(Deserialize)]
pub struct MergeResponse {
    #[serde(default)]
    pub message: String,
}
