//! Depot HTTP client
//!
//! Talks to the Depot back-office API. All authenticated traffic goes through
//! [`client::pipeline::AuthPipeline`], which attaches the stored bearer token and
//! renews the session once when the server answers 401 or 403.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod slice;
pub mod types;

pub use client::auth::AuthService;
pub use client::pipeline::{AuthPipeline, AuthPipelineBuilder};
pub use client::renewal::{HttpSessionRenewer, RenewalOutcome, SessionRenewer};
pub use client::resources::{Resource, ResourceClient};
pub use client::{ApiClient, ApiResponse, Attempt, ClientError, OutboundRequest};
pub use config::ClientConfig;
pub use slice::{EntitySlice, Identified};
