//! Authenticated request pipeline
//!
//! Every call made on behalf of the signed-in user goes through
//! [`AuthPipeline`]. The current access token is read from the session store and
//! attached as a bearer header. A 401 or 403 on a request that has not been
//! retried yet triggers one session renewal:
//!
//! - renewal fulfilled: the new tokens are persisted and the request is sent
//!   again exactly once; that second outcome is final
//! - renewal rejected: the user is signed out and the original error is returned
//! - renewal could not complete: the user is signed out and the renewal error
//!   is returned
//!
//! Every other status or transport error is returned unchanged.

use super::notify::TracingNotifier;
use super::renewal::{HttpSessionRenewer, RenewalOutcome, SessionRenewer};
use super::{ApiClient, ApiResponse, ClientError, OutboundRequest};
use crate::config::{ClientConfig, DEFAULT_REFRESH_PATH};
use depot_core::{
    MemorySessionStore, MemoryUserStore, Notification, NotificationSink, SessionStore, UserStore,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Shown when the server refuses the refresh token
pub const RENEWAL_REJECTED_MESSAGE: &str = "Please log in to the system again";

/// Shown when the renewal call itself fails
pub const RENEWAL_FAILED_MESSAGE: &str = "Unable to refresh session. Please log in again.";

/// Wraps [`ApiClient`] with bearer attachment and transparent session renewal
#[derive(Clone)]
pub struct AuthPipeline {
    client: ApiClient,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn NotificationSink>,
    renewer: Arc<dyn SessionRenewer>,
    /// Present when renewals are serialized across concurrent requests
    renewal_lock: Option<Arc<Mutex<()>>>,
}

impl AuthPipeline {
    /// Start building a pipeline around `client`
    pub fn builder(client: ApiClient) -> AuthPipelineBuilder {
        AuthPipelineBuilder::new(client)
    }

    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    pub fn notifier(&self) -> &Arc<dyn NotificationSink> {
        &self.notifier
    }

    /// Send a request through the pipeline
    pub async fn send(&self, mut request: OutboundRequest) -> Result<ApiResponse, ClientError> {
        self.execute(&mut request).await
    }

    /// Send a request through the pipeline, leaving its final attempt state in `request`
    pub async fn execute(
        &self,
        request: &mut OutboundRequest,
    ) -> Result<ApiResponse, ClientError> {
        let token = self.sessions.access_token().await?;

        let original = match self.client.dispatch(request, token.as_deref()).await {
            Ok(response) => return Ok(response),
            Err(error) if error.is_auth_failure() => error,
            Err(error) => return Err(error),
        };

        if !request.mark_retried() {
            debug!(
                path = request.path(),
                "authorization failed on a retried request, giving up"
            );
            return Err(original);
        }

        let guard = self.lock_renewal().await;

        let Some(outcome) = self.renew(token.as_deref()).await? else {
            debug!(
                path = request.path(),
                "session ended by a concurrent renewal, not signing out again"
            );
            return Err(original);
        };

        match outcome {
            RenewalOutcome::Fulfilled(session) => {
                self.sessions.set(&session).await?;
                drop(guard);

                info!(path = request.path(), "session renewed, re-issuing request");
                self.client
                    .dispatch(request, Some(&session.access_token))
                    .await
            }
            RenewalOutcome::Rejected(reason) => {
                warn!(%reason, "session renewal rejected, signing out");
                self.force_logout(RENEWAL_REJECTED_MESSAGE).await;
                Err(original)
            }
            RenewalOutcome::NetworkFailure(error) => {
                warn!(error = %error, "session renewal failed, signing out");
                self.force_logout(RENEWAL_FAILED_MESSAGE).await;
                Err(error)
            }
        }
    }

    async fn lock_renewal(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.renewal_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// Produce a renewal outcome for a request that was sent with `sent_with`
    ///
    /// Under single-flight, `None` means another request already ended the
    /// session while this one waited, and the user has been told.
    async fn renew(&self, sent_with: Option<&str>) -> Result<Option<RenewalOutcome>, ClientError> {
        let current = self.sessions.get().await?;

        if self.renewal_lock.is_some() {
            match (&current, sent_with) {
                (Some(session), _) if sent_with != Some(session.access_token.as_str()) => {
                    debug!("session was renewed while the request was in flight");
                    return Ok(Some(RenewalOutcome::Fulfilled(session.clone())));
                }
                (None, Some(_)) => return Ok(None),
                _ => {}
            }
        }

        Ok(Some(match current {
            Some(session) => self.renewer.renew(&session.refresh_token).await,
            None => RenewalOutcome::Rejected("no refresh token stored".to_string()),
        }))
    }

    /// Drop the signed-in user and both tokens, then tell the user why
    async fn force_logout(&self, message: &str) {
        if let Err(e) = self.users.clear().await {
            warn!(error = %e, "failed to clear user state");
        }
        if let Err(e) = self.sessions.clear().await {
            warn!(error = %e, "failed to clear stored session");
        }
        self.notifier.notify(Notification::error(message));
    }

    /// `GET path`
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(OutboundRequest::get(path)).await
    }

    /// `POST path` with a JSON body
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(OutboundRequest::post(path).json(body)?).await
    }

    /// `PUT path` with a JSON body
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(OutboundRequest::put(path).json(body)?).await
    }

    /// `PATCH path` with a JSON body
    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(OutboundRequest::patch(path).json(body)?).await
    }

    /// `DELETE path`
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(OutboundRequest::delete(path)).await
    }

    /// `GET path` and decode the `{ result }` envelope
    pub async fn get_result<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.get(path).await?.result()
    }
}

/// Builder for [`AuthPipeline`]
///
/// Anything not supplied falls back to in-memory stores, the tracing notifier
/// and an HTTP renewer on the same client.
pub struct AuthPipelineBuilder {
    client: ApiClient,
    sessions: Option<Arc<dyn SessionStore>>,
    users: Option<Arc<dyn UserStore>>,
    notifier: Option<Arc<dyn NotificationSink>>,
    renewer: Option<Arc<dyn SessionRenewer>>,
    refresh_path: String,
    single_flight: bool,
}

impl AuthPipelineBuilder {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            sessions: None,
            users: None,
            notifier: None,
            renewer: None,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            single_flight: true,
        }
    }

    /// Apply renewal settings from configuration
    #[must_use]
    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.refresh_path.clone_from(&config.auth.refresh_path);
        self.single_flight = config.single_flight_renewal;
        self
    }

    #[must_use]
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    #[must_use]
    pub fn user_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.users = Some(store);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn renewer(mut self, renewer: Arc<dyn SessionRenewer>) -> Self {
        self.renewer = Some(renewer);
        self
    }

    /// Path of the refresh endpoint used by the default renewer
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Serialize renewals so concurrent 401s share one refresh call
    #[must_use]
    pub const fn single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    pub fn build(self) -> AuthPipeline {
        let renewer = self.renewer.unwrap_or_else(|| {
            Arc::new(HttpSessionRenewer::with_path(
                self.client.clone(),
                self.refresh_path,
            ))
        });

        AuthPipeline {
            sessions: self
                .sessions
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            users: self.users.unwrap_or_else(|| Arc::new(MemoryUserStore::new())),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            renewer,
            renewal_lock: self.single_flight.then(|| Arc::new(Mutex::new(()))),
            client: self.client,
        }
    }
}
