//! Authenticated user state

use crate::{CoreResult, file};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// The signed-in user as returned by the login endpoint
///
/// Only the fields every screen relies on are typed; anything else the backend
/// sends is kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Best label for display: name, then email, then phone
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.phone.as_deref())
            .unwrap_or("unknown user")
    }
}

/// Application-wide holder of the authenticated user
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self) -> CoreResult<Option<User>>;
    async fn set(&self, user: &User) -> CoreResult<()>;
    async fn clear(&self) -> CoreResult<()>;
}

/// In-process user store
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    user: RwLock<Option<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self) -> CoreResult<Option<User>> {
        Ok(self.user.read().await.clone())
    }

    async fn set(&self, user: &User) -> CoreResult<()> {
        *self.user.write().await = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.user.write().await = None;
        Ok(())
    }
}

/// User store backed by a JSON file, for front-ends that restart between calls
#[derive(Debug)]
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn get(&self) -> CoreResult<Option<User>> {
        file::read_json(&self.path).await
    }

    async fn set(&self, user: &User) -> CoreResult<()> {
        file::write_json_private(&self.path, user).await
    }

    async fn clear(&self) -> CoreResult<()> {
        file::remove(&self.path).await
    }
}
