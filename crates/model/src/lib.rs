//! Model gateway.
//!
//! Two interchangeable streaming providers (Anthropic Messages and OpenAI
//! chat completions) behind one [`Model`] capability: a system/user prompt
//! pair in, an ordered stream of raw text fragments out.
//!
//! Provider choice is made once per run by [`select`], a small decision
//! table over the requested model and the available credentials.

pub use claude::Claude;
pub use config::ModelConfig;
pub use openai::OpenAI;
pub use provider::{Provider, build_provider};
pub use reqwest::{self, Client};
pub use request::Request;
pub use select::{ProviderKind, Selection, select};

pub mod claude;
mod config;
pub mod openai;
mod provider;
mod request;
mod select;
pub mod sse;

use anyhow::Result;
use futures_core::Stream;

/// A streaming text-generation backend.
///
/// A non-success initial response fails with an `Err` item before any
/// fragment. A transport failure mid-stream ends the stream early without
/// yielding anything further. Dropping the stream closes the connection.
pub trait Model: Send + Sync {
    /// Stream the response to `request` as raw text fragments.
    fn stream(&self, request: Request) -> impl Stream<Item = Result<String>> + Send;
}
