// Transport boundary: the client core builds request descriptors, a Transport
// turns them into responses. The HTTP implementation lives here; tests swap in
// scripted doubles.
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::config;
use crate::error::TransportError;

/// HTTP-style method for a resource operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// What an operation asks the transport to do: path suffix relative to the
/// configured base address, method, and optional JSON body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn get(path: impl Into<String>) -> Self {
        Self { path: path.into(), method: Method::Get, body: None }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { path: path.into(), method: Method::Post, body: Some(body) }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self { path: path.into(), method: Method::Put, body: Some(body) }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self { path: path.into(), method: Method::Patch, body: Some(body) }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { path: path.into(), method: Method::Delete, body: None }
    }
}

/// Port for performing operations against the remote API.
/// The client core never touches the network directly.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError>;
}

/// reqwest-backed transport that prefixes every request with one base address
#[derive(Debug)]
pub struct HttpTransport {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| TransportError::invalid_request(format!("invalid base url: {}", e)))?;

        // Url::join replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    /// Build a transport from the global config singleton
    pub fn from_config() -> Result<Self, TransportError> {
        let transport = &config().transport;
        Self::new(
            &transport.base_url,
            Duration::from_secs(transport.request_timeout_secs),
        )
    }

    fn join(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::invalid_request(format!("invalid path '{}': {}", path, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        let url = self.join(&request.path)?;
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self.http.request(request.method.into(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        // Empty bodies (204 and friends) become null; non-JSON bodies are kept as strings
        let payload = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(payload)
        } else {
            tracing::warn!(method = %request.method, path = %request.path, status = status.as_u16(), "request failed");
            Err(TransportError::http(status.as_u16(), payload))
        }
    }
}
