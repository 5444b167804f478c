//! Local menu cache.
//!
//! Holds a single snapshot of the last menu fetched from the remote store.
//! The snapshot is overwritten after every successful fetch (last writer
//! wins) and only read when the remote store cannot be used. It never
//! expires; serving a stale menu beats serving none.
//!
//! # Implementations
//!
//! - [`MemoryMenuCache`] - in-process, backed by `moka`
//! - [`FileMenuCache`] - JSON file on disk, survives restarts

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use corner_cafe_core::MenuData;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

const SNAPSHOT_KEY: &str = "menu";

/// Errors raised by a menu cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A cached menu and when it was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedMenuSnapshot {
    pub captured_at: DateTime<Utc>,
    pub menu: MenuData,
}

impl CachedMenuSnapshot {
    /// Capture `menu` now.
    #[must_use]
    pub fn capture(menu: MenuData) -> Self {
        Self {
            captured_at: Utc::now(),
            menu,
        }
    }
}

/// Single-slot store for the last good menu.
#[async_trait]
pub trait MenuCache: Send + Sync {
    /// Replace the stored snapshot with `menu`.
    async fn put(&self, menu: &MenuData) -> Result<(), CacheError>;

    /// The stored snapshot, if any.
    async fn snapshot(&self) -> Result<Option<CachedMenuSnapshot>, CacheError>;

    /// The stored menu, if any.
    async fn get(&self) -> Result<Option<MenuData>, CacheError> {
        Ok(self.snapshot().await?.map(|snapshot| snapshot.menu))
    }
}

// =============================================================================
// MemoryMenuCache
// =============================================================================

/// In-memory menu cache. Lost on restart.
#[derive(Clone)]
pub struct MemoryMenuCache {
    cache: Cache<&'static str, Arc<CachedMenuSnapshot>>,
}

impl MemoryMenuCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).build(),
        }
    }
}

impl Default for MemoryMenuCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MenuCache for MemoryMenuCache {
    async fn put(&self, menu: &MenuData) -> Result<(), CacheError> {
        let snapshot = CachedMenuSnapshot::capture(menu.clone());
        self.cache.insert(SNAPSHOT_KEY, Arc::new(snapshot)).await;
        Ok(())
    }

    async fn snapshot(&self) -> Result<Option<CachedMenuSnapshot>, CacheError> {
        Ok(self
            .cache
            .get(SNAPSHOT_KEY)
            .await
            .map(|snapshot| snapshot.as_ref().clone()))
    }
}

impl std::fmt::Debug for MemoryMenuCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryMenuCache").finish_non_exhaustive()
    }
}

// =============================================================================
// FileMenuCache
// =============================================================================

/// Menu cache persisted as a JSON file.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// snapshot, so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct FileMenuCache {
    path: PathBuf,
}

impl FileMenuCache {
    /// Cache stored at `path`. The file and its directory are created on the
    /// first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "menu".into(), |n| n.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!(".{name}.{:08x}.tmp", rand::random::<u32>()))
    }
}

#[async_trait]
impl MenuCache for FileMenuCache {
    #[instrument(skip(self, menu), fields(path = %self.path.display()))]
    async fn put(&self, menu: &MenuData) -> Result<(), CacheError> {
        let snapshot = CachedMenuSnapshot::capture(menu.clone());
        let bytes = serde_json::to_vec(&snapshot)?;

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!(bytes = bytes.len(), "Menu snapshot written");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn snapshot(&self) -> Result<Option<CachedMenuSnapshot>, CacheError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
