use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;

/// Pluggable blob storage backend addressed by logical path.
///
/// Implementors own durability and chunking. Every method is a single
/// self-contained operation: no stream or cursor outlives the call.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` at `path`, tagged with an optional content type.
    ///
    /// Writing to a path that already holds a blob supersedes it; subsequent
    /// reads return the newest write.
    async fn put(&self, path: &str, content_type: Option<&str>, data: Bytes)
    -> Result<(), BlobError>;

    /// Read the full content stored at `path`.
    ///
    /// Returns [`BlobError::NotFound`] if nothing is stored there.
    async fn get(&self, path: &str) -> Result<Bytes, BlobError>;

    /// Remove everything stored at `path`. Returns `true` if a blob existed.
    async fn delete(&self, path: &str) -> Result<bool, BlobError>;

    /// Look up the content type recorded for the blob at `path`.
    ///
    /// Returns [`BlobError::NotFound`] if nothing is stored there, and
    /// `Ok(None)` if the blob was stored without a content type.
    async fn content_type(&self, path: &str) -> Result<Option<String>, BlobError>;
}
