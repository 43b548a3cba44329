//! Logging bootstrap shared by every Depot binary

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::init_tracing;
