use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use stowage_blob::{BlobError, BlobStore};

use crate::uploader::Uploader;

/// Reference to a stored blob by logical path.
///
/// A handle holds no open resource: every operation acquires a fresh stream
/// from the store and releases it before returning. Creating a handle never
/// checks that the blob exists; that surfaces on the first read, delete or
/// content-type lookup.
#[derive(Clone)]
pub struct FileHandle {
    uploader: Arc<dyn Uploader>,
    store: Arc<dyn BlobStore>,
    path: String,
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileHandle {
    pub(crate) fn new(
        uploader: Arc<dyn Uploader>,
        store: Arc<dyn BlobStore>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            uploader,
            store,
            path: path.into(),
        }
    }

    /// Local filesystem path of the file. Always `None`: blobs live only in
    /// the remote store.
    pub fn path(&self) -> Option<&Path> {
        None
    }

    /// The logical path this handle refers to.
    pub fn logical_path(&self) -> &str {
        &self.path
    }

    /// Public URL of the file: `access_url + "/" + logical_path`, or `None`
    /// when the uploader has no access URL.
    pub fn url(&self) -> Option<String> {
        self.uploader
            .access_url()
            .map(|prefix| format!("{prefix}/{}", self.path))
    }

    /// Read the full content of the blob.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::NotFound`] if no blob is stored at the path.
    pub async fn read(&self) -> Result<Bytes, BlobError> {
        debug!(path = %self.path, "reading blob");
        self.store.get(&self.path).await
    }

    /// Delete the blob. Returns `false` if nothing was stored at the path.
    pub async fn delete(&self) -> Result<bool, BlobError> {
        debug!(path = %self.path, "deleting blob");
        self.store.delete(&self.path).await
    }

    /// Content type recorded when the blob was stored.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::NotFound`] if no blob is stored at the path.
    pub async fn content_type(&self) -> Result<Option<String>, BlobError> {
        debug!(path = %self.path, "looking up blob content type");
        self.store.content_type(&self.path).await
    }
}
