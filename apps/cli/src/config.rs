//! Configuration resolution for the CLI.
//!
//! Resolves amadeus.toml in priority order:
//! 1. `--config <path>` flag (explicit override)
//! 2. `{cwd}/amadeus.toml` (workspace config)
//! 3. `~/.config/amadeus/amadeus.toml` (global default)
//!
//! If the global default doesn't exist, it is generated automatically.
//! `${VAR}` references are expanded before parsing.

use acore::{Credentials, RepositoryRef, User};
use anyhow::{Context, Result};
use compact_str::CompactString;
use model::ModelConfig;
use pipeline::{ForgeConfig, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config template generated when no config exists.
const DEFAULT_CONFIG: &str = r#"[user]
id = "local"
# repository = "owner/name"
repo_token = "${GITHUB_TOKEN}"
anthropic_key = "${ANTHROPIC_API_KEY}"
openai_key = "${OPENAI_API_KEY}"
# model = "claude-sonnet-4-20250514"

[pipeline]
branch_prefix = "amadeus"
"#;

/// The whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmadeusConfig {
    /// Repository host.
    pub forge: ForgeConfig,
    /// Model gateway.
    pub models: ModelConfig,
    /// Pipeline limits and naming.
    pub pipeline: PipelineConfig,
    /// The operator's identity and credentials.
    pub user: UserConfig,
}

/// The `[user]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Continuation key.
    pub id: CompactString,
    /// `owner/name` or a GitHub URL.
    pub repository: Option<String>,
    /// Repository access token.
    pub repo_token: Option<String>,
    /// Anthropic API key.
    pub anthropic_key: Option<String>,
    /// OpenAI API key.
    pub openai_key: Option<String>,
    /// Preferred model.
    pub model: Option<CompactString>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: "local".into(),
            repository: None,
            repo_token: None,
            anthropic_key: None,
            openai_key: None,
            model: None,
        }
    }
}

impl UserConfig {
    /// Build the pipeline user. Blank values count as absent.
    pub fn to_user(&self) -> Result<User> {
        let mut user = User::new(self.id.clone()).with_credentials(Credentials {
            repo_token: self.repo_token.clone(),
            anthropic_key: self.anthropic_key.clone(),
            openai_key: self.openai_key.clone(),
        });
        if let Some(repository) = self.repository.as_deref().map(str::trim)
            && !repository.is_empty()
        {
            user = user.with_repository(RepositoryRef::parse(repository)?);
        }
        if let Some(model) = self.model.as_deref().map(str::trim)
            && !model.is_empty()
        {
            user = user.with_model(model);
        }
        Ok(user)
    }
}

impl AmadeusConfig {
    /// Parse a config document, expanding `${VAR}` references first.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(&expand_env_vars(text)).context("invalid amadeus config")
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to load {}", path.display()))
    }
}

/// Resolve the config following the priority chain.
pub fn resolve_config(config_flag: Option<&Path>) -> Result<AmadeusConfig> {
    if let Some(path) = config_flag {
        return AmadeusConfig::load(path);
    }

    let workspace_path = PathBuf::from("amadeus.toml");
    if workspace_path.exists() {
        return AmadeusConfig::load(&workspace_path);
    }

    let global_path = global_config_path();
    if !global_path.exists() {
        generate_default_config(&global_path)?;
        tracing::info!("generated default config at {}", global_path.display());
    }
    AmadeusConfig::load(&global_path)
}

/// Path to the global default config.
fn global_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("amadeus")
        .join("amadeus.toml")
}

/// Write the default config to `path`.
fn generate_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config to {}", path.display()))?;
    Ok(())
}

/// Expand `${VAR}` patterns with environment variable values.
///
/// Unknown variables are replaced with an empty string.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let name: String = chars.by_ref().take_while(|c| *c != '}').collect();
            if let Ok(value) = std::env::var(&name) {
                result.push_str(&value);
            }
        } else {
            result.push(ch);
        }
    }

    result
}
