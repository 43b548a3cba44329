//! CLI configuration utilities

use std::path::{Path, PathBuf};

/// Config file names looked up in the user config directory, in order
const DEFAULT_CONFIG_FILES: [&str; 3] = ["config.toml", "config.yaml", "config.yml"];

/// Pick the configuration file to load
///
/// An explicit path always wins. Otherwise the first existing file under
/// `<config dir>/depot/` is used; with none found only defaults and
/// environment variables apply.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| dirs::config_dir().and_then(|dir| find_in(&dir.join("depot"))))
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Where the signed-in user is kept, next to the session file
pub fn user_file_for(session_file: &Path) -> PathBuf {
    session_file.with_file_name("user.json")
}
