//! Model trait implementation for the OpenAI provider.

use super::{OpenAI, request::Body};
use crate::{Model, Request, sse};
use anyhow::Result;
use futures_core::Stream;
use reqwest::Method;

impl Model for OpenAI {
    fn stream(&self, req: Request) -> impl Stream<Item = Result<String>> + Send {
        let body = Body::from(&req);
        if let Ok(body) = serde_json::to_string(&body) {
            tracing::trace!("request: {}", body);
        }
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body);

        sse::stream(request, "openai", super::decode, req.timeout)
    }
}
