//! HTTP transport
//!
//! Every GSB endpoint is a JSON `POST`. [`ApiTransport`] is the seam between
//! services and the wire: [`HttpTransport`] talks to a server with reqwest,
//! tests substitute a mock.

use async_trait::async_trait;
use gsb_auth::{bearer_header, TENANT_HEADER};
use gsb_core::config::ClientConfig;
use gsb_core::{GsbError, GsbResult};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

/// One API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Endpoint path such as `/api/entity/query`
    pub path: String,
    pub body: Value,
    /// Access token, absent for the token request itself
    pub token: Option<String>,
    pub tenant_code: Option<String>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            body,
            token: None,
            tenant_code: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_tenant_code(mut self, tenant_code: Option<String>) -> Self {
        self.tenant_code = tenant_code;
        self
    }
}

/// Sends API requests and returns the decoded JSON response
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Post the request; a non-success status becomes an error
    async fn post(&self, request: ApiRequest) -> GsbResult<Value>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport for the configured server
    pub fn new(config: &ClientConfig) -> GsbResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .build()
            .map_err(|e| GsbError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url()?;
        debug!(base_url = %base_url, "Created HTTP transport");

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> GsbResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GsbError::Config(format!("invalid endpoint '{}': {}", path, e)))
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn post(&self, request: ApiRequest) -> GsbResult<Value> {
        let url = self.url(&request.path)?;

        let mut builder = self.client.post(url).json(&request.body);
        if let Some(token) = &request.token {
            builder = builder.header(AUTHORIZATION, bearer_header(token));
        }
        if let Some(tenant_code) = &request.tenant_code {
            builder = builder.header(TENANT_HEADER, tenant_code);
        }

        debug!("Sending request");
        let response = builder.send().await.map_err(|e| {
            error!(error = ?e, "HTTP request failed");
            GsbError::Transport(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read response body");
            GsbError::Transport(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            let message = error_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            error!(status = %status, error = %message, "API error");
            return Err(GsbError::from_status(status.as_u16(), message));
        }

        debug!(status = %status, bytes = text.len(), "Received response");
        parse_body(&text)
    }
}

/// Decode a success body; an empty body reads as `null`
pub fn parse_body(text: &str) -> GsbResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| {
        error!(error = ?e, "Failed to parse response");
        GsbError::Serialization(e)
    })
}

/// Message carried by an error body
///
/// JSON bodies are searched for `message`, `error`, `title` and `detail`;
/// anything else is used as is.
pub fn error_message(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(Value::Object(body)) = serde_json::from_str::<Value>(text) {
        let found = ["message", "error", "title", "detail"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str));
        if let Some(message) = found {
            return Some(message.to_string());
        }
    }

    Some(text.to_string())
}
