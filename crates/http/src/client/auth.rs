//! Login and logout

use super::pipeline::AuthPipeline;
use super::{ClientError, OutboundRequest};
use crate::config::DEFAULT_LOGIN_PATH;
use crate::types::{LoginRequest, LoginResult};
use depot_core::{Notification, User};

/// Shown after a successful login
pub const LOGIN_SUCCESS_MESSAGE: &str = "Logged in successfully";

/// Authentication service
///
/// Owns the session lifecycle: login creates it, logout ends it. Renewal is
/// handled by the pipeline.
#[derive(Clone)]
pub struct AuthService {
    pipeline: AuthPipeline,
    login_path: String,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(pipeline: AuthPipeline) -> Self {
        Self::with_login_path(pipeline, DEFAULT_LOGIN_PATH)
    }

    pub fn with_login_path(pipeline: AuthPipeline, login_path: impl Into<String>) -> Self {
        Self {
            pipeline,
            login_path: login_path.into(),
        }
    }

    pub const fn pipeline(&self) -> &AuthPipeline {
        &self.pipeline
    }

    /// Exchange credentials for a session and remember the user
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, ClientError> {
        match self.request_login(credentials).await {
            Ok(user) => {
                info!(user = user.display_name(), "logged in");
                self.pipeline
                    .notifier()
                    .notify(Notification::success(LOGIN_SUCCESS_MESSAGE));
                Ok(user)
            }
            Err(error) => {
                warn!(error = %error, "login failed");
                self.pipeline
                    .notifier()
                    .notify(Notification::error(error.server_message()));
                Err(error)
            }
        }
    }

    async fn request_login(&self, credentials: &LoginRequest) -> Result<User, ClientError> {
        let request = OutboundRequest::post(self.login_path.as_str()).json(credentials)?;
        let login: LoginResult = self.pipeline.client().execute(&request).await?;

        self.pipeline.sessions().set(&login.session()).await?;
        self.pipeline.users().set(&login.user).await?;
        Ok(login.user)
    }

    /// Forget the user and both tokens
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.pipeline.users().clear().await?;
        self.pipeline.sessions().clear().await?;
        info!("logged out");
        Ok(())
    }

    /// The signed-in user, if any
    pub async fn current_user(&self) -> Result<Option<User>, ClientError> {
        Ok(self.pipeline.users().get().await?)
    }

    /// Whether a session is stored
    pub async fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.pipeline.sessions().get().await?.is_some())
    }
}
