//! HTTP transport for REST API calls

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::transport::{Headers, Method, Response, Transport};
use crate::error::{Error, Result, TransportError};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

fn default_timeout() -> u64 {
    30
}

/// Sanitize response body for logging
/// Truncates long responses and drops non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Join a base URI and a request path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// Connection settings shared by every request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    /// Base URL every path is appended to
    pub uri: String,
    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Extra headers attached to every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Per-request timeout in seconds, 0 disables it
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Additional attempts on connection-level failures
    #[serde(default)]
    pub retries: u32,
}

impl TransportConfig {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            insecure: false,
            username: None,
            password: None,
            bearer_token: None,
            headers: BTreeMap::new(),
            timeout: default_timeout(),
            retries: 0,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

/// HTTP client wrapper implementing [`Transport`]
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: TransportConfig,
}

impl ApiClient {
    /// Create a new HTTP client
    pub fn new(config: TransportConfig) -> Result<Self> {
        url::Url::parse(&config.uri)
            .map_err(|e| Error::config(format!("Invalid base URI '{}': {}", config.uri, e)))?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("Invalid value for header '{}': {}", name, e)))?;
            default_headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .user_agent(concat!("restobj/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .danger_accept_invalid_certs(config.insecure);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.uri, path)
    }

    fn build_request(&self, method: Method, url: &str, body: Option<&str>) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method.into(), url);

        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        } else if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        request
    }

    fn classify(&self, method: Method, url: &str, attempts: u32, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                method,
                url: url.to_string(),
                timeout: self.config.timeout().unwrap_or_default(),
            }
        } else if err.is_connect() {
            TransportError::Connect {
                method,
                url: url.to_string(),
                attempts,
                source: err,
            }
        } else {
            TransportError::Request {
                method,
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Send once, retrying only connection-level failures
    async fn send_with_retries(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> Result<reqwest::Response, TransportError> {
        let max_attempts = self.config.retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            match self.build_request(method, url, body).send().await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_connect() && attempt < max_attempts => {
                    tracing::warn!(
                        "{} {} failed to connect (attempt {}/{}), retrying",
                        method,
                        url,
                        attempt,
                        max_attempts
                    );
                    attempt += 1;
                }
                Err(err) => return Err(self.classify(method, url, attempt, err)),
            }
        }
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Response, TransportError> {
        let url = self.url_for(path);
        tracing::debug!("{} {}", method, url);
        if let Some(body) = &body {
            tracing::debug!("Request body: {}", sanitize_for_log(body));
        }

        let response = self.send_with_retries(method, &url, body.as_deref()).await?;

        let status = response.status();
        let headers = Headers::from(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| self.classify(method, &url, 1, e))?;

        if status.as_u16() >= 400 {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(TransportError::Status {
                method,
                url,
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("{} {} -> {}: {}", method, url, status, sanitize_for_log(&body));

        Ok(Response {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
