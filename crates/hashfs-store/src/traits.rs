use std::path::Path;

use async_trait::async_trait;
use hashfs_types::ContentHash;

use crate::error::StoreResult;

/// Content-addressed blob store.
///
/// All implementations must satisfy these invariants:
/// - Blobs are immutable once written. The same bytes always produce the same
///   hash, so writing existing content is a no-op.
/// - A blob is readable as soon as `store` returns.
/// - Concurrent reads and writes are always safe.
/// - The store never interprets blob contents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store raw bytes and return their hash.
    async fn store(&self, data: Vec<u8>) -> StoreResult<ContentHash>;

    /// Store the contents of a file and return their hash.
    ///
    /// The default implementation reads the whole file and calls `store()`.
    async fn store_file(&self, path: &Path) -> StoreResult<ContentHash> {
        let data = tokio::fs::read(path).await?;
        self.store(data).await
    }

    /// Fetch a blob by hash.
    ///
    /// Returns `Ok(None)` if the blob does not exist.
    async fn fetch(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether a blob exists.
    async fn exists(&self, hash: &ContentHash) -> StoreResult<bool>;
}
