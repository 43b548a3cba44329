//! Exchanging a refresh token for a new session

use super::{ApiClient, ClientError, OutboundRequest};
use crate::config::DEFAULT_REFRESH_PATH;
use crate::types::{RefreshRequest, RefreshResult};
use async_trait::async_trait;
use depot_core::Session;

/// Result of one renewal attempt
#[derive(Debug)]
pub enum RenewalOutcome {
    /// The server issued new tokens
    Fulfilled(Session),
    /// The server answered but refused the refresh token
    Rejected(String),
    /// The renewal call could not be completed
    NetworkFailure(ClientError),
}

/// Collaborator that performs session renewal
#[async_trait]
pub trait SessionRenewer: Send + Sync {
    async fn renew(&self, refresh_token: &str) -> RenewalOutcome;
}

/// Renews sessions against the backend's refresh endpoint
#[derive(Clone)]
pub struct HttpSessionRenewer {
    client: ApiClient,
    refresh_path: String,
}

impl HttpSessionRenewer {
    pub fn new(client: ApiClient) -> Self {
        Self::with_path(client, DEFAULT_REFRESH_PATH)
    }

    pub fn with_path(client: ApiClient, refresh_path: impl Into<String>) -> Self {
        Self {
            client,
            refresh_path: refresh_path.into(),
        }
    }

    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }
}

#[async_trait]
impl SessionRenewer for HttpSessionRenewer {
    async fn renew(&self, refresh_token: &str) -> RenewalOutcome {
        let request = match OutboundRequest::post(self.refresh_path.as_str()).json(&RefreshRequest {
            refresh_token: refresh_token.to_string(),
        }) {
            Ok(request) => request,
            Err(e) => return RenewalOutcome::NetworkFailure(e),
        };

        // The refresh endpoint is called without a bearer header
        match self.client.dispatch(&request, None).await {
            Ok(response) => match response.result::<RefreshResult>() {
                Ok(session) => RenewalOutcome::Fulfilled(session),
                Err(e) => {
                    warn!(error = %e, "refresh response is missing tokens");
                    RenewalOutcome::NetworkFailure(e)
                }
            },
            Err(e) => match e.status() {
                Some(status) if (400..500).contains(&status) => {
                    RenewalOutcome::Rejected(e.server_message())
                }
                _ => RenewalOutcome::NetworkFailure(e),
            },
        }
    }
}
