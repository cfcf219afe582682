//! Provider dispatch.
//!
//! `Provider` is an enum over the two concrete backends; `build_provider()`
//! turns a [`Selection`] and the user's keys into one.

use crate::{Claude, Model, ModelConfig, OpenAI, ProviderKind, Request, Selection};
use acore::Credentials;
use anyhow::Result;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;

/// A configured model provider.
#[derive(Clone)]
pub enum Provider {
    /// Anthropic Messages API.
    Claude(Claude),
    /// OpenAI chat completions API.
    OpenAI(OpenAI),
}

impl Provider {
    /// The provider family.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Claude(_) => ProviderKind::Anthropic,
            Self::OpenAI(_) => ProviderKind::OpenAI,
        }
    }
}

/// Construct the provider for `selection` using the user's key for that
/// family and the configured endpoint.
pub fn build_provider(
    selection: &Selection,
    credentials: &Credentials,
    config: &ModelConfig,
    client: reqwest::Client,
) -> Result<Provider> {
    let Some(key) = selection.provider.key(credentials) else {
        anyhow::bail!("no {} key configured", selection.provider);
    };
    let provider = match selection.provider {
        ProviderKind::Anthropic => {
            Provider::Claude(Claude::custom(client, key, &config.anthropic_url)?)
        }
        ProviderKind::OpenAI => Provider::OpenAI(OpenAI::custom(client, key, &config.openai_url)?),
    };
    Ok(provider)
}

impl Model for Provider {
    fn stream(&self, request: Request) -> impl Stream<Item = Result<String>> + Send {
        let this = self.clone();
        try_stream! {
            match this {
                Provider::Claude(p) => {
                    let mut stream = std::pin::pin!(p.stream(request));
                    while let Some(fragment) = stream.next().await {
                        yield fragment?;
                    }
                }
                Provider::OpenAI(p) => {
                    let mut stream = std::pin::pin!(p.stream(request));
                    while let Some(fragment) = stream.next().await {
                        yield fragment?;
                    }
                }
            }
        }
    }
}
