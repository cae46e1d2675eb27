use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use hashfs_types::ContentHash;

use crate::error::StoreResult;
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs live behind a `RwLock`; the lock
/// is never held across an await point.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|blob| blob.len() as u64)
            .sum()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, data: Vec<u8>) -> StoreResult<ContentHash> {
        let hash = ContentHash::from_bytes(&data);
        let mut map = self.blobs.write().expect("lock poisoned");
        map.entry(hash).or_insert(data);
        Ok(hash)
    }

    async fn fetch(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(hash).cloned())
    }

    async fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.contains_key(hash))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn store_and_fetch() {
        let store = InMemoryBlobStore::new();
        let hash = store.store(b"hello world".to_vec()).await.unwrap();
        let data = store.fetch(&hash).await.unwrap().expect("should exist");
        assert_eq!(data, b"hello world");
    }

    #[tokio::test]
    async fn same_content_produces_same_hash() {
        let store = InMemoryBlobStore::new();
        let a = store.store(b"identical".to_vec()).await.unwrap();
        let b = store.store(b"identical".to_vec()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn different_content_produces_different_hashes() {
        let store = InMemoryBlobStore::new();
        let a = store.store(b"aaa".to_vec()).await.unwrap();
        let b = store.store(b"bbb".to_vec()).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn fetch_missing_returns_none() {
        let store = InMemoryBlobStore::new();
        let hash = ContentHash::from_bytes(b"missing");
        assert!(store.fetch(&hash).await.unwrap().is_none());
        assert!(!store.exists(&hash).await.unwrap());
    }

    #[tokio::test]
    async fn store_file_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, b"from disk").unwrap();

        let store = InMemoryBlobStore::new();
        let from_file = store.store_file(&path).await.unwrap();
        let from_bytes = store.store(b"from disk".to_vec()).await.unwrap();
        assert_eq!(from_file, from_bytes);
    }

    #[tokio::test]
    async fn store_file_missing_is_io_error() {
        let store = InMemoryBlobStore::new();
        let err = store
            .store_file(std::path::Path::new("/definitely/not/here"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::StoreError::Io(_)));
    }

    #[tokio::test]
    async fn concurrent_writes_are_safe() {
        let store = Arc::new(InMemoryBlobStore::new());
        let mut handles = Vec::new();
        for i in 0..16u8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.store(vec![i % 4]).await.unwrap()
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.len(), 4);
        assert_eq!(store.total_bytes(), 4);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryBlobStore::default();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryBlobStore"));
        assert!(debug.contains("blob_count"));
    }
}
