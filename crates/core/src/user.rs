//! The user a run acts for and the credentials they supplied.

use crate::RepositoryRef;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-user credentials. Empty strings count as absent.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Repository access token (required).
    #[serde(default)]
    pub repo_token: Option<String>,
    /// Anthropic API key.
    #[serde(default)]
    pub anthropic_key: Option<String>,
    /// OpenAI API key.
    #[serde(default)]
    pub openai_key: Option<String>,
}

impl Credentials {
    /// The repository token, if present.
    pub fn repo_token(&self) -> Option<&str> {
        present(&self.repo_token)
    }

    /// The Anthropic key, if present.
    pub fn anthropic_key(&self) -> Option<&str> {
        present(&self.anthropic_key)
    }

    /// The OpenAI key, if present.
    pub fn openai_key(&self) -> Option<&str> {
        present(&self.openai_key)
    }

    /// Whether any model key is present.
    pub fn has_model_key(&self) -> bool {
        self.anthropic_key().is_some() || self.openai_key().is_some()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("repo_token", &self.repo_token().is_some())
            .field("anthropic_key", &self.anthropic_key().is_some())
            .field("openai_key", &self.openai_key().is_some())
            .finish()
    }
}

/// The user a run acts for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Stable identity, also the continuation key.
    pub id: CompactString,
    /// Selected repository.
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
    /// Supplied credentials.
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Preferred model id.
    #[serde(default)]
    pub model: Option<CompactString>,
}

impl User {
    /// A user with no repository and no credentials.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Select a repository.
    pub fn with_repository(mut self, repository: RepositoryRef) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the preferred model.
    pub fn with_model(mut self, model: impl Into<CompactString>) -> Self {
        self.model = Some(model.into());
        self
    }
}
