//! Amadeus change-propagation pipeline.
//!
//! The [`Pipeline`] turns a natural-language prompt plus repository context
//! into committed file edits and an open (or reused) change request:
//!
//! `Init → ResolveRepo → ResolveBaseRef → (ResolveBranch | ReuseBranch) →
//! FetchTreeContext → GenerateEdits → CommitEdits →
//! (CreateChangeRequest | ReuseChangeRequest) → Done`
//!
//! Steps run strictly in order. Only repository resolution, branch
//! creation and a fully failed commit step end a run early; every other
//! failure degrades and is logged.
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = HttpBackend::new(Client::new(), ForgeConfig::default(), ModelConfig::default());
//! let pipeline = Pipeline::new(backend, MemoryStore::new());
//! let result = pipeline.execute(RunRequest::new(user, "add a healthcheck endpoint"), &()).await;
//! ```

pub use backend::{Backend, ForgeConfig, HttpBackend};
pub use config::PipelineConfig;
pub use continuation::{ContinuationStore, MemoryStore};
pub use extract::{Extractor, ParseError, parse};

use acore::{
    BranchState, ChangeRequestRef, CommitRef, Continuation, EditSet, Error, ErrorKind, FailedEdit,
    FileEdit, Generation, MergeStrategy, Observer, PipelineResult, Progress, RepositoryMetadata,
    RepositoryRef, Step, StreamEvent, Turn, User,
};
use chrono::Utc;
use forge::{ChangeRequest, FileWrite, Forge, NewChangeRequest};
use futures_util::StreamExt;
use model::{Model, ModelConfig, Request, select};
use tokio::sync::watch;

mod backend;
mod config;
pub mod continuation;
pub mod extract;
pub mod fallback;
pub mod naming;
pub mod prompt;

/// One run's input.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// The requesting user with their credentials and repository.
    pub user: User,
    /// The natural-language request.
    pub prompt: String,
    /// Preceding conversation, oldest first.
    pub history: Vec<Turn>,
    /// Branch and change request to extend instead of creating new ones.
    pub continuation: Option<Continuation>,
    /// Flips to `true` when the front end gives up on the run.
    pub cancel: Option<watch::Receiver<bool>>,
}

impl RunRequest {
    /// A fresh run.
    pub fn new(user: User, prompt: impl Into<String>) -> Self {
        Self {
            user,
            prompt: prompt.into(),
            history: Vec::new(),
            continuation: None,
            cancel: None,
        }
    }

    /// Attach conversation history.
    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    /// Continue an existing branch and change request.
    pub fn with_continuation(mut self, continuation: Option<Continuation>) -> Self {
        self.continuation = continuation;
        self
    }

    /// Attach a cancellation signal.
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// The change-propagation pipeline.
///
/// Holds no per-run state; concurrent runs for different users only share
/// the continuation store.
pub struct Pipeline<B: Backend, S: ContinuationStore = MemoryStore> {
    backend: B,
    store: S,
    models: ModelConfig,
    config: PipelineConfig,
}

impl<B: Backend, S: ContinuationStore> Pipeline<B, S> {
    /// Create a pipeline with default configuration.
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            models: ModelConfig::default(),
            config: PipelineConfig::default(),
        }
    }

    /// Replace the model configuration.
    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Replace the pipeline configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The continuation store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute one run.
    pub async fn execute(&self, request: RunRequest, observer: &impl Observer) -> PipelineResult {
        let RunRequest {
            user,
            prompt,
            history,
            continuation,
            cancel,
        } = request;

        observer.on_progress(&Progress::new(Step::Init, "🔐 Checking configuration..."));
        let (forge, repo) = match self.gateway(&user) {
            Ok(gateway) => gateway,
            Err(e) => return self.terminal(e),
        };

        observer.on_progress(&Progress::new(Step::ResolveRepo, "📡 Connecting to repo..."));
        let metadata = match forge.resolve(&repo).await {
            Ok(metadata) => metadata,
            Err(e) => {
                let message = format!("could not access {repo}: {e}");
                return self.terminal(Error::new(e.kind(), message));
            }
        };

        observer.on_progress(&Progress::new(Step::ResolveBaseRef, "🔍 Fetching branch..."));
        let base_sha = match forge.head_sha(&repo, &metadata.default_branch).await {
            Ok(sha) => sha,
            Err(e) => {
                let message = format!("could not read branch {}: {e}", metadata.default_branch);
                return self.terminal(Error::new(e.kind(), message));
            }
        };

        let branch = match &continuation {
            Some(continuation) => {
                observer.on_progress(&Progress::new(
                    Step::ReuseBranch,
                    format!("🌿 Using existing branch {}...", continuation.branch),
                ));
                BranchState {
                    name: continuation.branch.clone(),
                    base_commit_sha: base_sha,
                    created_in_this_run: false,
                }
            }
            None => {
                let name = naming::branch_name(
                    &self.config.branch_prefix,
                    &prompt,
                    Utc::now(),
                    rand::random(),
                );
                observer.on_progress(&Progress::new(
                    Step::ResolveBranch,
                    format!("🌿 Creating branch {name}..."),
                ));
                if let Err(e) = forge.create_branch(&repo, &name, &base_sha).await {
                    let message = format!("could not create branch {name}: {e}");
                    return self.terminal(Error::new(e.kind(), message));
                }
                BranchState {
                    name,
                    base_commit_sha: base_sha,
                    created_in_this_run: true,
                }
            }
        };
        tracing::info!(
            "working on {repo}@{} (created: {})",
            branch.name,
            branch.created_in_this_run
        );

        observer.on_progress(&Progress::new(
            Step::FetchTreeContext,
            "📂 Reading repo structure...",
        ));
        let tree_ref = if branch.created_in_this_run {
            branch.base_commit_sha.clone()
        } else {
            forge
                .head_sha(&repo, &branch.name)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("could not read {}, listing the base tree: {e}", branch.name);
                    branch.base_commit_sha.clone()
                })
        };
        let tree = forge
            .list_tree(&repo, &tree_ref)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("tree listing failed, continuing without context: {e}");
                Vec::new()
            });

        observer.on_progress(&Progress::new(Step::GenerateEdits, "🤖 AI is thinking..."));
        let user_message = prompt::user_message(&prompt, &tree, &history, &self.config);
        let (edits, generation) = self
            .generate(&user, &prompt, &user_message, cancel, observer)
            .await;
        observer.on_progress(
            &Progress::new(
                Step::GenerateEdits,
                format!("📝 {} file(s) to modify", edits.edits.len()),
            )
            .at(70)
            .detail(generation.to_string()),
        );

        observer.on_progress(&Progress::new(Step::CommitEdits, "💾 Committing changes..."));
        let (committed, failed, commit) = commit_all(&forge, &repo, &branch.name, &edits.edits).await;
        let mut result = PipelineResult::committed(branch.name.clone(), committed, failed, commit);
        result.summary = edits.summary;
        result.follow_ups = edits.follow_ups;
        result.generation = Some(generation);
        if !result.success {
            if let Some(error) = &result.error {
                tracing::warn!("run failed: {error}");
            }
            return result;
        }

        result.change_request = match &continuation {
            Some(continuation) => {
                observer.on_progress(&Progress::new(
                    Step::ReuseChangeRequest,
                    format!("📝 Added commit to PR #{}...", continuation.number),
                ));
                Some(ChangeRequestRef {
                    number: continuation.number,
                    url: forge.change_request_url(&repo, continuation.number),
                    head_branch: branch.name.clone(),
                    base_branch: metadata.default_branch.clone(),
                })
            }
            None => {
                observer.on_progress(&Progress::new(
                    Step::CreateChangeRequest,
                    "🔀 Creating Pull Request...",
                ));
                self.open_change_request(&forge, &repo, &metadata, &branch, &prompt, &result)
                    .await
            }
        };

        observer.on_progress(&Progress::new(Step::Done, "✅ Done!"));
        tracing::info!(
            "run finished: {} file(s) committed to {}",
            result.committed_paths.len(),
            branch.name
        );
        result
    }

    /// Resolve the change request a user's next prompts should extend and
    /// remember it.
    pub async fn start_continuation(
        &self,
        user: &User,
        number: Option<u64>,
    ) -> Result<Continuation, Error> {
        let (forge, repo) = self.gateway(user)?;
        let continuation =
            continuation::resolve(&forge, &repo, number, &self.config.branch_prefix).await?;
        tracing::info!(
            "user {} continues #{} on {}",
            user.id,
            continuation.number,
            continuation.branch
        );
        self.store.set(&user.id, continuation.clone());
        Ok(continuation)
    }

    /// The user's active continuation.
    pub fn continuation(&self, user: &User) -> Option<Continuation> {
        self.store.get(&user.id)
    }

    /// Leave continuation mode.
    pub fn stop_continuation(&self, user: &User) -> Option<Continuation> {
        self.store.clear(&user.id)
    }

    /// Open change requests on the user's repository, most recent first.
    pub async fn change_requests(&self, user: &User) -> Result<Vec<ChangeRequest>, Error> {
        let (forge, repo) = self.gateway(user)?;
        Ok(forge.list_open_change_requests(&repo).await?)
    }

    /// Merge a change request. Returns the host's message.
    pub async fn merge(
        &self,
        user: &User,
        number: u64,
        strategy: MergeStrategy,
    ) -> Result<String, Error> {
        let (forge, repo) = self.gateway(user)?;
        let message = forge.merge(&repo, number, strategy).await.map_err(|e| {
            let message = match e.kind() {
                ErrorKind::NotFound => format!("change request #{number} not found"),
                ErrorKind::NotMergeable => format!("change request #{number} is not mergeable: {e}"),
                ErrorKind::Forbidden => format!("not allowed to merge #{number}: {e}"),
                _ => e.to_string(),
            };
            Error::new(e.kind(), message)
        })?;
        tracing::info!("merged {repo}#{number} ({})", strategy.as_str());
        if self
            .store
            .get(&user.id)
            .is_some_and(|active| active.number == number)
        {
            self.store.clear(&user.id);
        }
        Ok(message)
    }

    /// Check the user's token and repository selection and build the
    /// repository gateway. Makes no network call.
    fn gateway(&self, user: &User) -> Result<(B::Forge, RepositoryRef), Error> {
        let Some(token) = user.credentials.repo_token() else {
            return Err(Error::configuration(
                "no repository access token configured",
            ));
        };
        let Some(repo) = user.repository.clone() else {
            return Err(Error::configuration("no repository selected"));
        };
        let forge = self.backend.forge(token)?;
        Ok((forge, repo))
    }

    fn terminal(&self, error: Error) -> PipelineResult {
        tracing::warn!("run failed ({}): {error}", error.kind);
        PipelineResult::failed(error)
    }

    /// Produce the edit set, falling back to a synthesised edit whenever
    /// the model path yields nothing.
    async fn generate(
        &self,
        user: &User,
        prompt: &str,
        user_message: &str,
        cancel: Option<watch::Receiver<bool>>,
        observer: &impl Observer,
    ) -> (EditSet, Generation) {
        let requested = user.model.as_deref().unwrap_or_default();
        let reason = match select(requested, &user.credentials, &self.models) {
            Err(e) => e.message,
            Ok(selection) => match self.backend.model(&selection, &user.credentials) {
                Err(e) => {
                    tracing::warn!("could not build {} provider: {e}", selection.provider);
                    format!("provider unavailable: {e}")
                }
                Ok(model) => {
                    let request =
                        self.models
                            .request(&selection.model, prompt::SYSTEM_PROMPT, user_message);
                    match stream_edits(&model, request, cancel, observer).await {
                        Ok(edits) if !edits.is_empty() => {
                            let generation = Generation::Model {
                                provider: selection.provider.as_str().into(),
                                model: selection.model,
                                substituted: selection.substituted,
                            };
                            return (edits, generation);
                        }
                        Ok(_) => "model returned no file edits".to_owned(),
                        Err(reason) => reason,
                    }
                }
            },
        };

        tracing::warn!("using fallback edit: {reason}");
        let edits = EditSet {
            summary: None,
            follow_ups: Vec::new(),
            edits: vec![fallback::fallback_edit(prompt, Utc::now())],
        };
        (edits, Generation::Fallback { reason })
    }

    async fn open_change_request(
        &self,
        forge: &B::Forge,
        repo: &RepositoryRef,
        metadata: &RepositoryMetadata,
        branch: &BranchState,
        prompt: &str,
        result: &PipelineResult,
    ) -> Option<ChangeRequestRef> {
        let title = naming::change_request_title(prompt);
        let body = naming::change_request_body(prompt, &result.committed_paths);
        let request = NewChangeRequest {
            title: &title,
            body: &body,
            head: &branch.name,
            base: &metadata.default_branch,
        };
        match forge.create_change_request(repo, request).await {
            Ok(reference) => {
                tracing::info!("opened {repo}#{}", reference.number);
                Some(reference)
            }
            Err(e) => {
                tracing::warn!("could not open change request for {}: {e}", branch.name);
                None
            }
        }
    }
}

/// Stream a model response through the extractor and parse it.
///
/// `Thinking` and `Done` bracket the call even when it fails or is
/// cancelled. The upstream stream is dropped before parsing.
async fn stream_edits(
    model: &impl Model,
    request: Request,
    mut cancel: Option<watch::Receiver<bool>>,
    observer: &impl Observer,
) -> Result<EditSet, String> {
    observer.on_stream(&StreamEvent::Thinking);
    let mut extractor = Extractor::new();
    let outcome = {
        let mut stream = std::pin::pin!(model.stream(request));
        loop {
            let next = match cancel.as_mut() {
                Some(rx) => tokio::select! {
                    next = stream.next() => Some(next),
                    _ = cancelled(rx) => None,
                },
                None => Some(stream.next().await),
            };
            match next {
                None => break Err("cancelled".to_owned()),
                Some(None) => break Ok(()),
                Some(Some(Err(e))) => {
                    tracing::warn!("model call failed: {e}");
                    break Err(format!("model call failed: {e}"));
                }
                Some(Some(Ok(fragment))) => {
                    tracing::trace!("fragment: {fragment}");
                    for path in extractor.push(&fragment) {
                        observer.on_stream(&StreamEvent::FileDiscovered {
                            path,
                            files_so_far: extractor.files().to_vec(),
                        });
                    }
                }
            }
        }
    };
    observer.on_stream(&StreamEvent::Done {
        files_so_far: extractor.files().to_vec(),
    });
    outcome?;

    parse(extractor.buffer()).map_err(|e| {
        let snippet: String = extractor.buffer().chars().take(200).collect();
        tracing::warn!("{e}, response starts with: {snippet}");
        e.to_string()
    })
}

/// Resolves once the flag flips to `true`. Never resolves if the sender
/// is gone without cancelling.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Commit edits one at a time in order. Returns committed paths, skipped
/// edits and the last commit.
async fn commit_all(
    forge: &impl Forge,
    repo: &RepositoryRef,
    branch: &str,
    edits: &[FileEdit],
) -> (Vec<String>, Vec<FailedEdit>, Option<CommitRef>) {
    let mut committed = Vec::new();
    let mut failed = Vec::new();
    let mut last = None;
    for edit in edits {
        match commit_one(forge, repo, branch, edit).await {
            Ok(commit) => {
                tracing::info!("committed {} ({})", edit.path, commit.sha);
                committed.push(edit.path.clone());
                last = Some(commit);
            }
            Err(e) => {
                if e.is_conflict() {
                    tracing::warn!(
                        "skipping {}, it changed on {branch} after it was read",
                        edit.path
                    );
                } else {
                    tracing::warn!("skipping {}: {e}", edit.path);
                }
                failed.push(FailedEdit {
                    path: edit.path.clone(),
                    kind: e.kind,
                    message: e.message,
                });
            }
        }
    }
    (committed, failed, last)
}

/// Read the current content to choose create or update, then write.
async fn commit_one(
    forge: &impl Forge,
    repo: &RepositoryRef,
    branch: &str,
    edit: &FileEdit,
) -> Result<CommitRef, Error> {
    let hash = match forge.read_file(repo, &edit.path, branch).await {
        Ok(current) => Some(current.hash),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };
    let message = naming::commit_message(edit, hash.is_some());
    let write = FileWrite {
        path: &edit.path,
        content: &edit.content,
        branch,
        message: &message,
        expected_hash: hash.as_deref(),
    };
    Ok(forge.write_file(repo, write).await?)
}
