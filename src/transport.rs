//! The real network client, seen through the interception layer.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{InterceptError, Result};
use crate::request::RequestDescriptor;
use crate::response::{Headers, ResponseDescriptor};

/// Something that can turn a request into a response.
///
/// Code under test depends on `Arc<dyn Transport>`; production wires in
/// [`ReqwestTransport`], tests wire in a [`crate::Dispatcher`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor>;
}

/// `reqwest`-backed transport. Redirects are not followed so captured
/// fixtures keep the redirect response itself.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| InterceptError::Transport(e.into()))?;

        let mut builder = self.client.request(method, request.url().clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        tracing::debug!(method = %request.method, url = %request.full_url(), "sending live request");
        let response = builder.send().await?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            // repeated headers collapse into one comma-joined value
            let merged = match headers.get(name.as_str()) {
                Some(existing) => format!("{existing}, {value}"),
                None => value.to_string(),
            };
            headers.insert(name.as_str(), merged);
        }
        let body = response.bytes().await?.to_vec();

        Ok(ResponseDescriptor {
            status,
            headers,
            body,
        })
    }
}
