use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use stowage_blob::{BlobError, BlobStore};

use crate::config::StowageConfig;
use crate::factory::create_blob_store;
use crate::file::UploadFile;
use crate::handle::FileHandle;
use crate::uploader::Uploader;

/// Storage adapter: writes uploads into a [`BlobStore`] and hands out
/// [`FileHandle`]s.
///
/// The adapter owns its store exclusively. It adds no locking: concurrent
/// writes to the same path both commit and the newest one wins.
#[derive(Clone)]
pub struct Storage {
    uploader: Arc<dyn Uploader>,
    store: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Create an adapter over the given uploader and blob store.
    pub fn new(uploader: Arc<dyn Uploader>, store: Arc<dyn BlobStore>) -> Self {
        Self { uploader, store }
    }

    /// Build an adapter from a loaded configuration.
    ///
    /// No connection is opened here; backends connect on first use.
    pub fn from_config(config: StowageConfig) -> Result<Self, BlobError> {
        let store = create_blob_store(&config.blob)?;
        Ok(Self::new(Arc::new(config.uploader), store))
    }

    /// The uploader used to resolve paths and URLs.
    pub fn uploader(&self) -> &Arc<dyn Uploader> {
        &self.uploader
    }

    /// Store an upload at the path the uploader resolves for its filename.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Write`] if the upload has no filename, or any
    /// error from [`Storage::store_at`].
    pub async fn store(&self, file: &dyn UploadFile) -> Result<FileHandle, BlobError> {
        let Some(filename) = file.filename().filter(|name| !name.is_empty()) else {
            warn!("refusing to store upload without a filename");
            return Err(BlobError::Write("upload has no filename".into()));
        };
        let path = self.uploader.store_path(filename);
        let data = file.read().await?;
        self.store_at(data, file.content_type(), path).await
    }

    /// Store `data` at an already resolved logical path.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Write`] if the store rejects the write, or a
    /// connection/authentication error if the store cannot be reached.
    pub async fn store_at(
        &self,
        data: impl Into<Bytes>,
        content_type: Option<&str>,
        path: impl Into<String>,
    ) -> Result<FileHandle, BlobError> {
        let path = path.into();
        let data = data.into();
        debug!(path = %path, content_type = ?content_type, size = data.len(), "storing blob");

        if let Err(e) = self.store.put(&path, content_type, data).await {
            warn!(path = %path, error = %e, "failed to store blob");
            return Err(e);
        }

        info!(path = %path, "blob stored");
        Ok(self.retrieve_at(path))
    }

    /// Handle for the file the uploader resolves from `identifier`.
    ///
    /// Performs no I/O and never fails, whether or not the blob exists.
    pub fn retrieve(&self, identifier: &str) -> FileHandle {
        self.retrieve_at(self.uploader.store_path(identifier))
    }

    /// Handle for an already resolved logical path. Performs no I/O.
    pub fn retrieve_at(&self, path: impl Into<String>) -> FileHandle {
        FileHandle::new(Arc::clone(&self.uploader), Arc::clone(&self.store), path)
    }
}
