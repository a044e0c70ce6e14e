use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use stowage_blob::error::BlobError;
use stowage_blob::store::BlobStore;
use stowage_blob::types::StoredBlob;

/// In-memory [`BlobStore`] backed by a [`DashMap`].
///
/// Only the newest write for each path is kept. This implementation is fully
/// synchronous internally; the async trait methods return immediately.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, StoredBlob>,
}

impl MemoryBlobStore {
    /// Create a new, empty in-memory blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths currently holding a blob.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Returns `true` if no blob is stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Returns `true` if a blob is stored at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.blobs.contains_key(path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        path: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<(), BlobError> {
        self.blobs
            .insert(path.to_owned(), StoredBlob::new(data, content_type));
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Bytes, BlobError> {
        self.blobs
            .get(path)
            .map(|blob| blob.data.clone())
            .ok_or_else(|| BlobError::NotFound(path.to_owned()))
    }

    async fn delete(&self, path: &str) -> Result<bool, BlobError> {
        Ok(self.blobs.remove(path).is_some())
    }

    async fn content_type(&self, path: &str) -> Result<Option<String>, BlobError> {
        self.blobs
            .get(path)
            .map(|blob| blob.content_type.clone())
            .ok_or_else(|| BlobError::NotFound(path.to_owned()))
    }
}
