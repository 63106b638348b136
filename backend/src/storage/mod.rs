//! Object storage collaborator
//!
//! Blobs are addressed by owner-scoped paths (`images/<owner>/<uuid>`) and
//! exposed through a durable download URL.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path` and return the durable URL
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String>;

    /// Remove the blob at `path`; removing an absent blob succeeds
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Reject empty, absolute or parent-relative paths
fn check_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("storage path is empty");
    }
    let all_normal = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !all_normal {
        bail!("storage path {:?} must be relative without '..'", path);
    }
    Ok(())
}

// ============================================================================
// Local Filesystem
// ============================================================================

/// Blob store on the local filesystem
///
/// Files are served back under `public_base_url` by the router.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        check_path(path)?;
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(&target, &bytes)
            .await
            .with_context(|| format!("writing {}", target.display()))?;

        debug!(path, size = bytes.len(), "Blob stored");
        Ok(self.url_for(path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        check_path(path)?;
        let target = self.root.join(path);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", target.display())),
        }
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Blob store held in memory, for tests and the memory profile
#[derive(Debug, Default)]
pub struct InMemoryObjectStorage {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.blobs.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        check_path(path)?;
        self.blobs.write().await.insert(path.to_string(), bytes);
        Ok(format!("memory://{}", path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        check_path(path)?;
        self.blobs.write().await.remove(path);
        Ok(())
    }
}
