use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use stowage_blob::BlobError;

/// A file-like input handed to [`Storage::store`](crate::Storage::store).
#[async_trait]
pub trait UploadFile: Send + Sync {
    /// Original filename, used to resolve the logical path.
    fn filename(&self) -> Option<&str> {
        None
    }

    /// MIME content type to record with the blob.
    fn content_type(&self) -> Option<&str>;

    /// Read the full body.
    async fn read(&self) -> Result<Bytes, BlobError>;
}

/// An upload whose body is already in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl MemoryFile {
    /// Create a new in-memory upload with the given body.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the original filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[async_trait]
impl UploadFile for MemoryFile {
    fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn read(&self) -> Result<Bytes, BlobError> {
        Ok(self.data.clone())
    }
}

/// An upload read from the local filesystem when stored.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    content_type: Option<String>,
}

impl LocalFile {
    /// Create an upload for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content_type: None,
        }
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Location of the file on disk.
    pub fn local_path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UploadFile for LocalFile {
    fn filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn read(&self) -> Result<Bytes, BlobError> {
        tokio::fs::read(&self.path)
            .await
            .map(Bytes::from)
            .map_err(|e| BlobError::Read(format!("{}: {e}", self.path.display())))
    }
}
