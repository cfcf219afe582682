//! Gateway construction.
//!
//! A [`Backend`] builds the repository and model gateways for one run from
//! the user's credentials. [`HttpBackend`] targets the real hosts; tests
//! substitute in-memory gateways.

use acore::Credentials;
use forge::{Forge, GitHub};
use model::{Client, Model, ModelConfig, Provider, Selection, build_provider};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Builds per-run gateways.
pub trait Backend: Send + Sync {
    /// Repository gateway type.
    type Forge: Forge;
    /// Model gateway type.
    type Model: Model;

    /// A repository gateway authenticated with `token`.
    fn forge(&self, token: &str) -> forge::Result<Self::Forge>;

    /// A model gateway for `selection`.
    fn model(&self, selection: &Selection, credentials: &Credentials)
    -> anyhow::Result<Self::Model>;
}

/// Repository host settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// REST API base.
    pub api_url: String,
    /// Web host for derived links.
    pub web_url: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_url: forge::github::API_URL.into(),
            web_url: forge::github::WEB_URL.into(),
            timeout_secs: forge::github::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// GitHub plus the Anthropic/OpenAI providers over one shared client.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    forge: ForgeConfig,
    models: ModelConfig,
}

impl HttpBackend {
    /// Create a backend.
    pub fn new(client: Client, forge: ForgeConfig, models: ModelConfig) -> Self {
        Self {
            client,
            forge,
            models,
        }
    }
}

impl Backend for HttpBackend {
    type Forge = GitHub;
    type Model = Provider;

    fn forge(&self, token: &str) -> forge::Result<GitHub> {
        Ok(GitHub::custom(
            self.client.clone(),
            token,
            &self.forge.api_url,
            &self.forge.web_url,
        )?
        .with_timeout(Duration::from_secs(self.forge.timeout_secs)))
    }

    fn model(&self, selection: &Selection, credentials: &Credentials) -> anyhow::Result<Provider> {
        build_provider(selection, credentials, &self.models, self.client.clone())
    }
}
