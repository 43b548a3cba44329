//! Depot REST client

pub mod auth;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod renewal;
pub mod request;
pub mod resources;

pub use error::ClientError;
pub use request::{ApiResponse, Attempt, OutboundRequest};

use crate::config::ClientConfig;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("depot-client/", env!("CARGO_PKG_VERSION"));

/// Transport for Depot API calls
///
/// Knows how to turn an [`OutboundRequest`] into an HTTP exchange. It does not
/// read the session store; callers pass the bearer token explicitly.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::builder()
            .base_url(&config.base_url)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build a reqwest request, attaching `Authorization: Bearer <token>` when a token is given
    pub fn prepare(&self, request: &OutboundRequest, token: Option<&str>) -> reqwest::RequestBuilder {
        // The stored token is the only credential sent; a caller-set header is dropped
        let mut headers = request.headers().clone();
        headers.remove(header::AUTHORIZATION);

        if let Some(token) = token {
            match header::HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(e) => warn!(error = %e, "stored access token is not a valid header value"),
            }
        }

        let mut builder = self
            .client
            .request(request.method().clone(), self.url(request.path()))
            .headers(headers);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }

        if let Some(body) = request.body_bytes() {
            builder = builder.body(body.clone());
        }

        builder
    }

    /// Send a request once
    ///
    /// 2xx responses come back as [`ApiResponse`]; any other status becomes a
    /// [`ClientError`] carrying the status and the raw body text.
    pub async fn dispatch(
        &self,
        request: &OutboundRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        debug!(
            method = %request.method(),
            path = request.path(),
            authenticated = token.is_some(),
            "dispatching request"
        );

        let response = self.prepare(request, token).send().await?;
        let status = response.status();

        if status.is_success() {
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok(ApiResponse::new(status, headers, body))
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            debug!(status = status.as_u16(), path = request.path(), "request failed");
            Err(ClientError::from_status(status, message))
        }
    }

    /// Send an unauthenticated JSON request and decode the `{ result }` envelope
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: &OutboundRequest,
    ) -> Result<T, ClientError> {
        self.dispatch(request, None).await?.result()
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()));

        if let Some(timeout) = self.timeout {
            if !timeout.is_zero() {
                client_builder = client_builder.timeout(timeout);
            }
        }

        let client = client_builder.build()?;

        Ok(ApiClient { client, base_url })
    }
}
