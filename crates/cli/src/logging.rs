use anyhow::Result;
use depot_core::tracing::{InstrumentationConfig, init_tracing};
use tracing::Level;

/// Initialize logging for the CLI
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` still wins over `level` when set.
pub fn init_logging(level: Level, json: bool) -> Result<()> {
    let level_str = level.as_str().to_lowercase();
    let filter = format!("depot={level_str},depot_http={level_str},depot_core={level_str}");

    let mut config = InstrumentationConfig::from_env().with_log_level(filter);
    config.json |= json;

    init_tracing(&config)
}
