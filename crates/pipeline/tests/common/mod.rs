//! In-memory gateways that record every call.

#![allow(dead_code)]

use acore::{
    ChangeRequestRef, CommitRef, Credentials, FileContent, MergeStrategy, Observer, Progress,
    RepositoryMetadata, RepositoryRef, StreamEvent, TreeEntry, User,
};
use amadeus_pipeline::{Backend, MemoryStore, Pipeline};
use async_stream::try_stream;
use forge::{ChangeRequest, Error, FileWrite, Forge, NewChangeRequest};
use futures_core::Stream;
use model::{Model, Request, Selection};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

#[derive(Default)]
pub struct ForgeState {
    pub calls: Vec<String>,
    /// Existing files: path -> content hash.
    pub files: HashMap<String, String>,
    /// Paths whose write fails with a conflict.
    pub conflicts: HashSet<String>,
    pub open: Vec<ChangeRequest>,
    pub missing_repo: bool,
    pub fail_head: bool,
    pub fail_branch: bool,
    /// Every write fails upstream.
    pub fail_writes: bool,
    pub fail_tree: bool,
    pub fail_change_request: bool,
    pub unmergeable: bool,
    commits: usize,
}

#[derive(Clone, Default)]
pub struct FakeForge(pub Arc<Mutex<ForgeState>>);

impl FakeForge {
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().calls.clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    pub fn with(&self, f: impl FnOnce(&mut ForgeState)) -> &Self {
        f(&mut self.0.lock().unwrap());
        self
    }

    fn record(&self, call: String) -> std::sync::MutexGuard<'_, ForgeState> {
        let mut state = self.0.lock().unwrap();
        state.calls.push(call);
        state
    }
}

impl Forge for FakeForge {
    async fn resolve(&self, repo: &RepositoryRef) -> forge::Result<RepositoryMetadata> {
        let state = self.record(format!("resolve {repo}"));
        if state.missing_repo {
            return Err(Error::NotFound("Not Found".into()));
        }
        Ok(RepositoryMetadata {
            repo: repo.clone(),
            default_branch: "main".into(),
            private: false,
            html_url: format!("https://github.com/{repo}"),
            description: None,
        })
    }

    async fn head_sha(&self, _repo: &RepositoryRef, branch: &str) -> forge::Result<String> {
        let state = self.record(format!("head_sha {branch}"));
        if state.fail_head {
            return Err(Error::NotFound(format!("heads/{branch}")));
        }
        Ok(if branch == "main" { "base000" } else { "tip000" }.into())
    }

    async fn create_branch(
        &self,
        _repo: &RepositoryRef,
        name: &str,
        from_sha: &str,
    ) -> forge::Result<()> {
        let state = self.record(format!("create_branch {name} {from_sha}"));
        if state.fail_branch {
            return Err(Error::Conflict("Reference already exists".into()));
        }
        Ok(())
    }

    async fn read_file(
        &self,
        _repo: &RepositoryRef,
        path: &str,
        at_ref: &str,
    ) -> forge::Result<FileContent> {
        let state = self.record(format!("read_file {path} {at_ref}"));
        match state.files.get(path) {
            Some(hash) => Ok(FileContent {
                content: "old".into(),
                hash: hash.clone(),
            }),
            None => Err(Error::NotFound(path.into())),
        }
    }

    async fn write_file(
        &self,
        _repo: &RepositoryRef,
        write: FileWrite<'_>,
    ) -> forge::Result<CommitRef> {
        let mut state = self.record(format!(
            "write_file {} {} {:?} {}",
            write.path, write.branch, write.expected_hash, write.message
        ));
        if state.fail_writes {
            return Err(Error::Upstream {
                status: 500,
                message: "server error".into(),
            });
        }
        if state.conflicts.contains(write.path) {
            return Err(Error::Conflict(format!("{} does not match", write.path)));
        }
        state.commits += 1;
        let sha = format!("c{:03}", state.commits);
        Ok(CommitRef {
            url: format!("https://github.com/octo/svc/commit/{sha}"),
            sha,
        })
    }

    async fn list_tree(&self, _repo: &RepositoryRef, at_ref: &str) -> forge::Result<Vec<TreeEntry>> {
        let state = self.record(format!("list_tree {at_ref}"));
        if state.fail_tree {
            return Err(Error::Upstream {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        Ok(vec![TreeEntry {
            path: "main.go".into(),
            kind: acore::EntryKind::File,
        }])
    }

    async fn create_change_request(
        &self,
        _repo: &RepositoryRef,
        request: NewChangeRequest<'_>,
    ) -> forge::Result<ChangeRequestRef> {
        let state = self.record(format!(
            "create_change_request {} -> {}",
            request.head, request.base
        ));
        if state.fail_change_request {
            return Err(Error::Conflict("A pull request already exists".into()));
        }
        Ok(ChangeRequestRef {
            number: 7,
            url: "https://github.com/octo/svc/pull/7".into(),
            head_branch: request.head.into(),
            base_branch: request.base.into(),
        })
    }

    async fn get_change_request(
        &self,
        _repo: &RepositoryRef,
        number: u64,
    ) -> forge::Result<ChangeRequestRef> {
        let state = self.record(format!("get_change_request {number}"));
        state
            .open
            .iter()
            .find(|r| r.reference.number == number)
            .map(|r| r.reference.clone())
            .ok_or_else(|| Error::NotFound(format!("#{number}")))
    }

    async fn list_open_change_requests(
        &self,
        _repo: &RepositoryRef,
    ) -> forge::Result<Vec<ChangeRequest>> {
        let state = self.record("list_open_change_requests".into());
        Ok(state.open.clone())
    }

    async fn merge(
        &self,
        _repo: &RepositoryRef,
        number: u64,
        strategy: MergeStrategy,
    ) -> forge::Result<String> {
        let state = self.record(format!("merge {number} {}", strategy.as_str()));
        if state.unmergeable {
            return Err(Error::NotMergeable("Pull Request is not mergeable".into()));
        }
        Ok("Pull Request successfully merged".into())
    }

    fn change_request_url(&self, repo: &RepositoryRef, number: u64) -> String {
        format!("https://github.com/{repo}/pull/{number}")
    }
}

/// What the fake model does when called.
#[derive(Clone)]
pub enum Script {
    Fragments(Vec<String>),
    Fail(String),
    Hang,
}

#[derive(Clone)]
pub struct FakeModel {
    pub script: Script,
    pub requests: Arc<Mutex<Vec<Request>>>,
}

impl FakeModel {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            requests: Default::default(),
        }
    }

    /// Split `text` into fragments of `size` characters.
    pub fn chunked(text: &str, size: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let fragments = chars.chunks(size).map(|c| c.iter().collect()).collect();
        Self::new(Script::Fragments(fragments))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Model for FakeModel {
    fn stream(&self, request: Request) -> impl Stream<Item = anyhow::Result<String>> + Send {
        self.requests.lock().unwrap().push(request);
        let script = self.script.clone();
        try_stream! {
            match script {
                Script::Fragments(fragments) => {
                    for fragment in fragments {
                        yield fragment;
                    }
                }
                Script::Fail(message) => {
                    Err::<(), _>(anyhow::anyhow!("{message}"))?;
                }
                Script::Hang => std::future::pending::<()>().await,
            }
        }
    }
}

pub struct FakeBackend {
    pub forge: FakeForge,
    pub model: FakeModel,
    pub forges_built: AtomicUsize,
    pub selections: Mutex<Vec<Selection>>,
}

impl Backend for FakeBackend {
    type Forge = FakeForge;
    type Model = FakeModel;

    fn forge(&self, _token: &str) -> forge::Result<FakeForge> {
        self.forges_built.fetch_add(1, Ordering::SeqCst);
        Ok(self.forge.clone())
    }

    fn model(&self, selection: &Selection, _credentials: &Credentials) -> anyhow::Result<FakeModel> {
        self.selections.lock().unwrap().push(selection.clone());
        Ok(self.model.clone())
    }
}

pub fn pipeline(model: FakeModel) -> (Pipeline<FakeBackend>, FakeForge, FakeModel) {
    let forge = FakeForge::default();
    let backend = FakeBackend {
        forge: forge.clone(),
        model: model.clone(),
        forges_built: AtomicUsize::new(0),
        selections: Mutex::new(Vec::new()),
    };
    (Pipeline::new(backend, MemoryStore::new()), forge, model)
}

pub fn credentials(anthropic: bool, openai: bool) -> Credentials {
    Credentials {
        repo_token: Some("ghp_test".into()),
        anthropic_key: anthropic.then(|| "sk-ant-test".into()),
        openai_key: openai.then(|| "sk-test".into()),
    }
}

pub fn user() -> User {
    User::new("alice")
        .with_repository(RepositoryRef::new("octo", "svc"))
        .with_credentials(credentials(true, false))
        .with_model("claude-sonnet-4-20250514")
}

/// Records every event it sees.
#[derive(Default)]
pub struct Recorder {
    pub progress: Mutex<Vec<Progress>>,
    pub stream: Mutex<Vec<StreamEvent>>,
}

impl Recorder {
    pub fn stream(&self) -> Vec<StreamEvent> {
        self.stream.lock().unwrap().clone()
    }

    /// Detail attached to the first progress report at `percentage`.
    pub fn detail_at(&self, percentage: u8) -> Option<String> {
        self.progress
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.percentage == percentage)
            .and_then(|p| p.detail.clone())
    }

    pub fn percentages(&self) -> Vec<u8> {
        self.progress
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.percentage)
            .collect()
    }
}

impl Observer for Recorder {
    fn on_progress(&self, progress: &Progress) {
        self.progress.lock().unwrap().push(progress.clone());
    }

    fn on_stream(&self, event: &StreamEvent) {
        self.stream.lock().unwrap().push(event.clone());
    }
}
