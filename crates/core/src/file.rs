//! Small JSON files holding credentials

use crate::{CoreError, CoreResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Read and decode `path`; a missing or blank file yields `None`
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> CoreResult<Option<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) if contents.trim().is_empty() => Ok(None),
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `value` to `path`, creating parent directories, readable by the owner only
pub async fn write_json_private<T: Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;

    let mut options = tokio::fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;

    // Files created before this process keep their old mode until narrowed here
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(path, permissions)
            .await
            .map_err(|e| {
                CoreError::storage_error(format!(
                    "failed to restrict permissions on {}: {e}",
                    path.display()
                ))
            })?;
    }

    Ok(())
}

/// Delete `path`; deleting a missing file is not an error
pub async fn remove(path: &Path) -> CoreResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
