//! Provider and model selection.
//!
//! | requested family | key for family | key for other | result                       |
//! |------------------|----------------|---------------|------------------------------|
//! | any              | yes            | -             | requested model, same family |
//! | any              | no             | yes           | other family's default       |
//! | any              | no             | no            | configuration error          |

use crate::ModelConfig;
use acore::{Credentials, Error};
use compact_str::CompactString;
use serde::Serialize;
use std::fmt;

/// Provider family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Anthropic Messages API.
    Anthropic,
    /// OpenAI chat completions API.
    OpenAI,
}

impl ProviderKind {
    /// The family a model id belongs to. `claude*` is Anthropic, anything
    /// else is treated as OpenAI.
    pub fn detect(model: &str) -> Self {
        if model.trim().to_ascii_lowercase().starts_with("claude") {
            Self::Anthropic
        } else {
            Self::OpenAI
        }
    }

    /// The other family.
    pub fn other(&self) -> Self {
        match self {
            Self::Anthropic => Self::OpenAI,
            Self::OpenAI => Self::Anthropic,
        }
    }

    /// Name used in logs and results.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
        }
    }

    /// The user's key for this family.
    pub fn key<'a>(&self, credentials: &'a Credentials) -> Option<&'a str> {
        match self {
            Self::Anthropic => credentials.anthropic_key(),
            Self::OpenAI => credentials.openai_key(),
        }
    }

    /// This family's default model.
    pub fn default_model<'a>(&self, config: &'a ModelConfig) -> &'a CompactString {
        match self {
            Self::Anthropic => &config.anthropic_default,
            Self::OpenAI => &config.openai_default,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The provider and model chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Provider to call.
    pub provider: ProviderKind,
    /// Model id to send.
    pub model: CompactString,
    /// Model the user asked for.
    pub requested: CompactString,
    /// Whether `model` replaced `requested`.
    pub substituted: bool,
}

/// Choose a provider for `requested` given the user's credentials.
///
/// Fails with a configuration error, before any network call, when
/// neither family has a key.
pub fn select(
    requested: &str,
    credentials: &Credentials,
    config: &ModelConfig,
) -> Result<Selection, Error> {
    let requested = match requested.trim() {
        "" => config.default.clone(),
        model => CompactString::from(model),
    };
    let family = ProviderKind::detect(&requested);

    if family.key(credentials).is_some() {
        return Ok(Selection {
            provider: family,
            model: requested.clone(),
            requested,
            substituted: false,
        });
    }

    let other = family.other();
    if other.key(credentials).is_some() {
        let model = other.default_model(config).clone();
        tracing::info!("no {family} key, substituting {model} for {requested}");
        return Ok(Selection {
            provider: other,
            model,
            requested,
            substituted: true,
        });
    }

    Err(Error::configuration(
        "no AI provider key configured, add an Anthropic or OpenAI key",
    ))
}
