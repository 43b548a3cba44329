//! Persisted session tokens
//!
//! A [`Session`] is the pair of bearer credentials handed out by the backend at
//! login. The [`SessionStore`] trait is the only way the rest of the workspace
//! reads or writes it, so the storage medium can be swapped for an in-memory
//! fake in tests.

use crate::{CoreResult, file};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "ACCESS_TOKEN";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "REFRESH_TOKEN";

/// Access and refresh token pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Durable storage for the current session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the stored session, if both tokens are present
    async fn get(&self) -> CoreResult<Option<Session>>;

    /// Replace the stored session
    async fn set(&self, session: &Session) -> CoreResult<()>;

    /// Remove both tokens
    async fn clear(&self) -> CoreResult<()>;

    /// Current access token
    async fn access_token(&self) -> CoreResult<Option<String>> {
        Ok(self.get().await?.map(|session| session.access_token))
    }

    /// Current refresh token
    async fn refresh_token(&self) -> CoreResult<Option<String>> {
        Ok(self.get().await?.map(|session| session.refresh_token))
    }
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> CoreResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn set(&self, session: &Session) -> CoreResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}

/// Session store backed by a JSON file of `ACCESS_TOKEN` / `REFRESH_TOKEN` keys
///
/// The file is rewritten on every change and survives process restarts. A
/// missing file means no session.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> CoreResult<BTreeMap<String, String>> {
        Ok(file::read_json(&self.path).await?.unwrap_or_default())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> CoreResult<Option<Session>> {
        let mut entries = self.read_entries().await?;
        let access = entries.remove(ACCESS_TOKEN_KEY);
        let refresh = entries.remove(REFRESH_TOKEN_KEY);

        Ok(match (access, refresh) {
            (Some(access_token), Some(refresh_token)) => Some(Session {
                access_token,
                refresh_token,
            }),
            _ => None,
        })
    }

    async fn set(&self, session: &Session) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(ACCESS_TOKEN_KEY.to_string(), session.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), session.refresh_token.clone());
        file::write_json_private(&self.path, &entries).await
    }

    async fn clear(&self) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        file::remove(&self.path).await
    }
}
