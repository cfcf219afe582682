//! GitHub REST implementation of [`Forge`](crate::Forge).
//!
//! Holds a shared `reqwest::Client`, pre-built headers (bearer token,
//! accept, api version, user agent) and the API base URL, like the model
//! providers do for their endpoints.

use crate::{Error, RepositoryRef, Result};
use reqwest::{
    Client, RequestBuilder, Response, Url,
    header::{self, HeaderMap, HeaderValue},
};
use std::time::Duration;

mod api;
mod forge;

/// The public GitHub REST API.
pub const API_URL: &str = "https://api.github.com";

/// The public GitHub web host.
pub const WEB_URL: &str = "https://github.com";

/// REST API version header value.
const API_VERSION: &str = "2022-11-28";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The GitHub repository gateway.
#[derive(Clone)]
pub struct GitHub {
    /// The HTTP client.
    client: Client,
    /// Request headers (authorization, accept, api version, user agent).
    headers: HeaderMap,
    /// REST API base.
    api_url: Url,
    /// Web host used for derived links.
    web_url: String,
    /// Per-request timeout.
    timeout: Duration,
}

impl GitHub {
    /// Create a gateway targeting github.com.
    pub fn new(client: Client, token: &str) -> Result<Self> {
        Self::custom(client, token, API_URL, WEB_URL)
    }

    /// Create a gateway targeting a GitHub Enterprise (or test) host.
    pub fn custom(client: Client, token: &str, api_url: &str, web_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", token.trim())
            .parse::<HeaderValue>()
            .map_err(|_| Error::Unauthorized("token is not a valid header value".into()))?;
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("amadeus/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let api_url =
            Url::parse(api_url).map_err(|e| Error::Decode(format!("api url '{api_url}': {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(Error::Decode(format!("api url '{api_url}' cannot be a base")));
        }
        Ok(Self {
            client,
            headers,
            api_url,
            web_url: web_url.trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the API base URL.
    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// Build `/repos/{owner}/{name}/...`.
    ///
    /// Each element of `rest` may contain `/` (file paths, branch names)
    /// and is split into separately encoded segments.
    pub fn repo_url(&self, repo: &RepositoryRef, rest: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Decode("api url cannot be a base".into()))?;
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str()]);
            for part in rest {
                segments.extend(part.split('/').filter(|s| !s.is_empty()));
            }
        }
        Ok(url)
    }

    /// Send a request, turning non-success statuses into typed errors.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("github {what} failed with {status}: {body}");
        Err(Error::from_status(status, describe(what, &body)))
    }

    /// Send a request and decode the JSON body.
    async fn json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let text = self.send(request, what).await?.text().await?;
        tracing::trace!("github {what} response: {text}");
        serde_json::from_str(&text).map_err(Into::into)
    }
}

/// Combine the operation with the host's error message.
fn describe(what: &str, body: &str) -> String {
    match serde_json::from_str::<api::ErrorBody>(body) {
        Ok(err) => format!("{what}: {}", err.message),
        Err(_) if body.trim().is_empty() => what.to_owned(),
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            format!("{what}: {snippet}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::describe;

    #[test]
    fn describe_prefers_host_message() {
        let body = r#"{"message":"Reference already exists","documentation_url":"x"}"#;
        assert_eq!(
            describe("create branch", body),
            "create branch: Reference already exists"
        );
        assert_eq!(describe("read file", ""), "read file");
        assert_eq!(describe("read file", "<html>"), "read file: <html>");
    }
}
