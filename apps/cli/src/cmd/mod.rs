//! CLI argument parsing and subcommand handlers.

use crate::{config, terminal};
use acore::{MergeStrategy, User};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use compact_str::CompactString;
use pipeline::{HttpBackend, MemoryStore, Pipeline, RunRequest};
use std::path::PathBuf;
use tokio::sync::watch;

/// Drive code changes on a GitHub repository from natural language.
#[derive(Parser, Debug)]
#[command(name = "amadeus", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Config file path.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository override (`owner/name`).
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Model name override.
    #[arg(long, global = true)]
    pub model: Option<CompactString>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Turn a prompt into commits and a pull request.
    Run {
        /// The change to make.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
        /// Add commits to an open pull request instead of opening a new
        /// one: the given number, or the latest amadeus pull request.
        #[arg(long = "continue", value_name = "NUMBER", num_args = 0..=1)]
        resume: Option<Option<u64>>,
    },
    /// List open pull requests.
    Prs,
    /// Merge a pull request.
    Merge {
        /// Pull request number.
        number: u64,
        /// Merge method: merge, squash or rebase.
        #[arg(long, default_value = "squash")]
        method: MergeStrategy,
    },
}

impl Cli {
    /// Parse configuration and run the selected command.
    pub async fn run(self) -> Result<()> {
        let config = config::resolve_config(self.config.as_deref())?;
        let mut user = config.user.to_user()?;
        if let Some(repo) = &self.repo {
            user = user.with_repository(repo.parse()?);
        }
        if let Some(model) = self.model {
            user = user.with_model(model);
        }

        let client = model::Client::builder()
            .build()
            .context("failed to build http client")?;
        let backend = HttpBackend::new(client, config.forge, config.models.clone());
        let pipeline = Pipeline::new(backend, MemoryStore::new())
            .with_models(config.models)
            .with_config(config.pipeline);

        match self.command {
            Command::Run { prompt, resume } => run(&pipeline, user, prompt.join(" "), resume).await,
            Command::Prs => prs(&pipeline, &user).await,
            Command::Merge { number, method } => {
                let message = pipeline.merge(&user, number, method).await?;
                println!("✅ #{number} merged ({}): {message}", method.as_str());
                Ok(())
            }
        }
    }
}

async fn run(
    pipeline: &Pipeline<HttpBackend>,
    user: User,
    prompt: String,
    resume: Option<Option<u64>>,
) -> Result<()> {
    if let Some(number) = resume {
        let continuation = pipeline.start_continuation(&user, number).await?;
        println!(
            "🔁 Continuing PR #{} on {}",
            continuation.number, continuation.branch
        );
    }

    let (cancel, cancelled) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, finishing with what has been generated");
            let _ = cancel.send(true);
        }
    });

    let request = RunRequest::new(user.clone(), prompt)
        .with_continuation(pipeline.continuation(&user))
        .with_cancel(cancelled);
    let result = pipeline
        .execute(request, &terminal::TerminalObserver::default())
        .await;
    println!("\n{}", terminal::render_result(&result));

    if let Some(error) = result.error {
        bail!("{} ({})", error.message, error.kind);
    }
    Ok(())
}

async fn prs(pipeline: &Pipeline<HttpBackend>, user: &User) -> Result<()> {
    let open = pipeline.change_requests(user).await?;
    if open.is_empty() {
        println!("No open pull requests.");
        return Ok(());
    }
    for request in open {
        println!(
            "#{:<5} {:<40} {}",
            request.reference.number, request.reference.head_branch, request.title
        );
    }
    Ok(())
}
