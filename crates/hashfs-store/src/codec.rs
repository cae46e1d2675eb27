//! Typed objects on top of the blob store.
//!
//! Objects are encoded as JSON and stored as ordinary blobs, so an object's
//! hash is the hash of its encoded bytes. Raw file bodies share the same
//! store and the same hash space.

use std::sync::Arc;

use hashfs_types::{ContentHash, Entry, Object};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// Encodes values into the blob store and decodes them back out.
#[derive(Clone)]
pub struct ObjectCodec {
    store: Arc<dyn BlobStore>,
}

impl ObjectCodec {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// The underlying blob store.
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Encode `value` and store it. Performs exactly one store write.
    pub async fn put_object<T>(&self, value: &T) -> StoreResult<ContentHash>
    where
        T: Serialize + Sync + ?Sized,
    {
        let data =
            serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.store(data).await
    }

    /// Fetch and decode the object at `hash`.
    ///
    /// Returns `Ok(None)` if nothing is stored under `hash`, and
    /// [`StoreError::Decode`] if the bytes are not a `T`.
    pub async fn get_object<T: DeserializeOwned>(&self, hash: &ContentHash) -> StoreResult<Option<T>> {
        let Some(data) = self.store.fetch(hash).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| StoreError::Decode {
                hash: *hash,
                reason: e.to_string(),
            })
    }

    pub async fn get_entry(&self, hash: &ContentHash) -> StoreResult<Option<Entry>> {
        self.get_object(hash).await
    }

    /// Like [`get_object`](Self::get_object), accepting any [`Object`] shape.
    pub async fn get_any(&self, hash: &ContentHash) -> StoreResult<Option<Object>> {
        self.get_object(hash).await
    }
}

impl std::fmt::Debug for ObjectCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBlobStore;
    use hashfs_types::{DirectoryEntry, FileEntry, Wrapper};

    fn codec() -> ObjectCodec {
        ObjectCodec::new(Arc::new(InMemoryBlobStore::new()))
    }

    #[tokio::test]
    async fn put_then_get_entry() {
        let codec = codec();
        let body = codec.store().store(b"hi".to_vec()).await.unwrap();
        let entry = Entry::File(FileEntry::new("text/plain", body));

        let hash = codec.put_object(&entry).await.unwrap();
        assert_eq!(codec.get_entry(&hash).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn put_is_deterministic() {
        let codec = codec();
        let dir = Entry::Directory(DirectoryEntry::default());
        let a = codec.put_object(&dir).await.unwrap();
        let b = codec.put_object(&dir.clone()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn hash_is_hash_of_encoded_bytes() {
        let codec = codec();
        let wrapper = Object::from(Wrapper::new(ContentHash::from_bytes(b"d")));
        let hash = codec.put_object(&wrapper).await.unwrap();
        let bytes = serde_json::to_vec(&wrapper).unwrap();
        assert_eq!(hash, ContentHash::from_bytes(&bytes));
    }

    #[tokio::test]
    async fn missing_object_is_none() {
        let codec = codec();
        let got = codec.get_any(&ContentHash::from_bytes(b"nothing")).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn raw_bytes_fail_to_decode() {
        let codec = codec();
        let hash = codec.store().store(b"just text".to_vec()).await.unwrap();
        let err = codec.get_any(&hash).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { hash: h, .. } if h == hash));
    }

    #[tokio::test]
    async fn wrapper_is_not_an_entry() {
        let codec = codec();
        let hash = codec
            .put_object(&Object::from(Wrapper::new(ContentHash::from_bytes(b"x"))))
            .await
            .unwrap();
        assert!(codec.get_entry(&hash).await.is_err());
        assert!(matches!(
            codec.get_any(&hash).await.unwrap(),
            Some(Object::Wrapper(_))
        ));
    }
}
