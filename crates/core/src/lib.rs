//! Depot core types shared by the HTTP client and the CLI

pub mod error;
mod file;
pub mod notification;
pub mod session;
pub mod user;

#[cfg(feature = "tracing")]
pub mod tracing;

pub use error::{CoreError, CoreResult};
pub use notification::{MemoryNotifier, Notification, NotificationSink, Severity};
pub use session::{
    ACCESS_TOKEN_KEY, FileSessionStore, MemorySessionStore, REFRESH_TOKEN_KEY, Session,
    SessionStore,
};
pub use user::{FileUserStore, MemoryUserStore, User, UserStore};
