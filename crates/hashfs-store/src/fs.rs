//! Filesystem-backed blob store.
//!
//! Layout:
//! ```text
//! {root}/
//! ├── objects/
//! │   ├── ab/
//! │   │   └── cde123...  # blob bytes (remainder of the hex hash)
//! │   └── 12/
//! │       └── 3456789...
//! └── tmp/               # in-flight writes, renamed into objects/
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hashfs_types::ContentHash;
use tokio::fs;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// Blob store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    read_only: bool,
}

impl FsBlobStore {
    /// Open (creating if needed) a writable store at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self {
            root: root.into(),
            read_only: false,
        };
        fs::create_dir_all(store.objects_dir()).await?;
        fs::create_dir_all(store.tmp_dir()).await?;
        tracing::debug!(root = %store.root.display(), "opened blob store");
        Ok(store)
    }

    /// Open an existing store without write access.
    pub fn read_only(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            read_only: true,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn objects_dir(&self) -> PathBuf {
        self.root.join("objects")
    }

    fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Where the blob for `hash` lives (whether or not it exists yet).
    pub fn object_path(&self, hash: &ContentHash) -> PathBuf {
        let hex = hash.to_hex();
        self.objects_dir().join(&hex[..2]).join(&hex[2..])
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, data: Vec<u8>) -> StoreResult<ContentHash> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }

        let hash = ContentHash::from_bytes(&data);
        let path = self.object_path(&hash);
        if fs::try_exists(&path).await? {
            return Ok(hash);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so readers never observe a partial blob.
        let staging = self.tmp_dir().join(uuid::Uuid::now_v7().to_string());
        fs::write(&staging, &data).await?;
        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }

        tracing::trace!(hash = %hash.short_hex(), bytes = data.len(), "stored blob");
        Ok(hash)
    }

    async fn fetch(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.object_path(hash)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(fs::try_exists(self.object_path(hash)).await?)
    }
}
