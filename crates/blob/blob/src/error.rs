use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The backing store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The backing store rejected the supplied credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The backing store rejected a write.
    #[error("write rejected: {0}")]
    Write(String),

    /// No blob is stored at the requested path.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// Blob content could not be read.
    #[error("read error: {0}")]
    Read(String),

    /// Any other storage backend error.
    #[error("backend error: {0}")]
    Backend(String),

    /// The store configuration is invalid or could not be loaded.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl BlobError {
    /// Returns `true` if this error reports a missing blob.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
