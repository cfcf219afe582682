//! OpenAI chat completions provider.

use reqwest::{Client, header::HeaderMap};

mod provider;
mod request;
mod stream;

pub use request::uses_completion_tokens;
pub use stream::decode;

/// The OpenAI chat completions endpoint.
pub const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// The OpenAI provider.
#[derive(Clone)]
pub struct OpenAI {
    /// The HTTP client.
    pub client: Client,
    /// Request headers (authorization, content-type).
    headers: HeaderMap,
    /// Chat completions endpoint URL.
    endpoint: String,
}

impl OpenAI {
    /// Create a provider targeting the OpenAI API.
    pub fn api(client: Client, key: &str) -> anyhow::Result<Self> {
        Self::custom(client, key, ENDPOINT)
    }

    /// Create a provider targeting a custom OpenAI-compatible endpoint.
    pub fn custom(client: Client, key: &str, endpoint: &str) -> anyhow::Result<Self> {
        use reqwest::header;
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse()?);
        headers.insert(header::ACCEPT, "text/event-stream".parse()?);
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", key.trim()).parse()?,
        );
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
