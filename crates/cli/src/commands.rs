//! CLI commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use depot_core::{FileSessionStore, FileUserStore};
use depot_http::client::notify::TracingNotifier;
use depot_http::types::LoginRequest;
use depot_http::{
    ApiClient, AuthPipeline, AuthService, ClientConfig, OutboundRequest, Resource, ResourceClient,
};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Email address or phone number
        email_or_phone: String,

        /// Password
        #[arg(long, env = "DEPOT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List a collection, e.g. `depot list bulk-payments`
    List {
        resource: Resource,
    },

    /// Fetch one entity by id
    Get {
        resource: Resource,
        id: String,
    },

    /// Send an arbitrary authenticated request and print the response body
    Request {
        /// HTTP method, e.g. GET or POST
        #[arg(value_parser = parse_method)]
        method: Method,

        /// Path relative to the API base URL
        path: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },
}

impl Commands {
    pub async fn execute(self, client_config: ClientConfig) -> Result<()> {
        let auth = build_auth_service(&client_config)?;

        match self {
            Self::Login {
                email_or_phone,
                password,
            } => {
                let user = auth
                    .login(&LoginRequest::new(email_or_phone, password))
                    .await?;
                println!("Logged in as {}", user.display_name());
            }
            Self::Logout => {
                auth.logout().await?;
                println!("Logged out");
            }
            Self::Whoami => match auth.current_user().await? {
                Some(user) => print_json(&serde_json::to_value(&user)?)?,
                None => bail!("not logged in"),
            },
            Self::List { resource } => {
                let resources = ResourceClient::new(auth.pipeline().clone());
                let items: Vec<Value> = resources.list(resource).await?;
                info!(%resource, count = items.len(), "listed collection");
                print_json(&Value::Array(items))?;
            }
            Self::Get { resource, id } => {
                let resources = ResourceClient::new(auth.pipeline().clone());
                let item: Value = resources.get(resource, &id).await?;
                print_json(&item)?;
            }
            Self::Request { method, path, data } => {
                let mut request = OutboundRequest::new(method, path);
                if let Some(raw) = data {
                    let body: Value =
                        serde_json::from_str(&raw).context("--data must be valid JSON")?;
                    request = request.json(&body)?;
                }

                let response = auth.pipeline().send(request).await?;
                match response.json::<Value>() {
                    Ok(body) => print_json(&body)?,
                    Err(_) => println!("{}", response.text()),
                }
            }
        }

        Ok(())
    }
}

/// Wire the pipeline to file-backed stores so the session outlives the process
fn build_auth_service(client_config: &ClientConfig) -> Result<AuthService> {
    let session_file = client_config.session_file_or_default();
    let user_file = config::user_file_for(&session_file);

    let client = ApiClient::from_config(client_config)?;
    let pipeline = AuthPipeline::builder(client)
        .config(client_config)
        .session_store(Arc::new(FileSessionStore::new(session_file)))
        .user_store(Arc::new(FileUserStore::new(user_file)))
        .notifier(Arc::new(TracingNotifier))
        .build();

    Ok(AuthService::with_login_path(
        pipeline,
        client_config.auth.login_path.clone(),
    ))
}

/// Methods are case-insensitive on the command line
fn parse_method(raw: &str) -> Result<Method, http::method::InvalidMethod> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
