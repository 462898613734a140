//! Sending requests over the wire.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use taskdeck_core::error::{Result, TaskdeckError};

use super::headers::DefaultHeaders;
use super::request::{ApiRequest, ApiResponse, Method};

/// Delivers a request and returns the response, whatever its status.
///
/// Implementations only fail when no response was received at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, base_url: &str, request: &ApiRequest) -> Result<ApiResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, base_url: &str, request: &ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", base_url, request.path);

        let mut builder = self.client.request(to_reqwest(request.method), url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            TaskdeckError::transport(format!("{} {} failed: {}", request.method, url, e))
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            TaskdeckError::transport(format!("Failed to read response from {}: {}", url, e))
        })?;

        tracing::debug!("{} {} -> {}", request.method, url, status);
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

/// Base URL, transport and default headers bundled together.
///
/// The auth session and the API client each hold a clone; clones share the
/// same transport and the same [`DefaultHeaders`].
#[derive(Clone)]
pub struct HttpContext {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    headers: Arc<DefaultHeaders>,
}

impl HttpContext {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: Arc::new(DefaultHeaders::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &DefaultHeaders {
        &self.headers
    }

    /// Sends `request` with the default headers merged in. Headers already
    /// on the request take precedence.
    pub async fn dispatch(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        for (name, value) in self.headers.snapshot() {
            request.headers.entry(name).or_insert(value);
        }
        self.transport.send(&self.base_url, &request).await
    }
}
