//! Image blob storage backends
//!
//! Object-storage side of a report. Backends are replaceable; the local
//! filesystem backend serves development and single-node deployments, the
//! in-memory backend serves tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Object storage for report images
///
/// One blob per report. `upload` overwrites on name conflict; the returned
/// URL must resolve publicly.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store bytes under `name`, returning the public URL
    async fn upload(&self, bytes: &[u8], name: &str) -> StoreResult<String>;

    /// Read the blob with this name
    async fn download(&self, name: &str) -> StoreResult<Vec<u8>>;

    /// Delete the blob with this name
    async fn delete(&self, name: &str) -> StoreResult<()>;

    /// All blob names currently stored
    async fn list(&self) -> StoreResult<Vec<String>>;

    /// Whether a blob with this name exists
    async fn exists(&self, name: &str) -> StoreResult<bool>;
}

/// Local filesystem image store
pub struct LocalImageStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    /// Create the store, creating the base directory if needed
    pub async fn new(
        base_path: impl AsRef<Path>,
        public_base_url: impl Into<String>,
    ) -> StoreResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::Configuration(format!(
                "failed to create image directory {:?}: {}",
                base_path, e
            ))
        })?;

        info!(path = ?base_path, "Initialized local image store");

        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn blob_path(&self, name: &str) -> StoreResult<PathBuf> {
        // blob names are flat; a separator would escape the store directory
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(StoreError::Storage(format!("invalid blob name: {}", name)));
        }
        Ok(self.base_path.join(name))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, bytes: &[u8], name: &str) -> StoreResult<String> {
        let path = self.blob_path(name)?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::Storage(format!("write failed: {}", e)))?;

        debug!(name = %name, size = bytes.len(), "Blob uploaded");
        Ok(format!("{}/{}", self.public_base_url, name))
    }

    async fn download(&self, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.blob_path(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::Storage(format!("read failed: {}", e))),
        }
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.blob_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(name = %name, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::Storage(format!("delete failed: {}", e))),
        }
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| StoreError::Storage(format!("list failed: {}", e)))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Storage(format!("list failed: {}", e)))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        let path = self.blob_path(name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

/// In-memory image store (tests)
#[derive(Default)]
pub struct MemoryImageStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob contents, if present
    pub async fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(name).cloned()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, bytes: &[u8], name: &str) -> StoreResult<String> {
        self.blobs
            .write()
            .await
            .insert(name.to_string(), bytes.to_vec());
        Ok(format!("memory://images/{}", name))
    }

    async fn download(&self, name: &str) -> StoreResult<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        match self.blobs.write().await.remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.blobs.read().await.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "http://localhost:3000/images/")
            .await
            .unwrap();

        let url = store.upload(b"png bytes", "report.png").await.unwrap();
        assert_eq!(url, "http://localhost:3000/images/report.png");
        assert!(store.exists("report.png").await.unwrap());
        assert_eq!(store.download("report.png").await.unwrap(), b"png bytes");
        assert_eq!(store.list().await.unwrap(), vec!["report.png"]);

        store.delete("report.png").await.unwrap();
        assert!(!store.exists("report.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_store_overwrites_on_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "http://localhost/images")
            .await
            .unwrap();

        store.upload(b"first", "a.png").await.unwrap();
        store.upload(b"second", "a.png").await.unwrap();
        let data = fs::read(dir.path().join("a.png")).await.unwrap();
        assert_eq!(data, b"second");
    }

    #[tokio::test]
    async fn test_local_store_rejects_path_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "http://localhost/images")
            .await
            .unwrap();

        assert!(store.upload(b"x", "../escape.png").await.is_err());
        assert!(store.upload(b"x", "a/b.png").await.is_err());
        assert!(store.upload(b"x", "").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryImageStore::new();
        assert!(matches!(
            store.delete("nope.png").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.download("nope.png").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryImageStore::new();
        let url = store.upload(b"bytes", "x.png").await.unwrap();
        assert_eq!(url, "memory://images/x.png");
        assert_eq!(store.get("x.png").await.unwrap(), b"bytes");
        store.delete("x.png").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
