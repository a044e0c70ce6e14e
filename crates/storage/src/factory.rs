use std::sync::Arc;

use stowage_blob::{BlobError, BlobStore};
#[cfg(feature = "gridfs")]
use stowage_blob_gridfs::GridFsBlobStore;
use stowage_blob_memory::MemoryBlobStore;
use tracing::info;

use crate::config::BlobConfig;

/// Create a blob store from the given configuration.
///
/// Construction performs no I/O; network backends connect on first use.
pub fn create_blob_store(config: &BlobConfig) -> Result<Arc<dyn BlobStore>, BlobError> {
    let store: Arc<dyn BlobStore> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryBlobStore::new()),
        #[cfg(feature = "gridfs")]
        "gridfs" => {
            info!(
                host = %config.gridfs.host,
                port = config.gridfs.port,
                database = %config.gridfs.database,
                bucket = %config.gridfs.bucket,
                "configuring GridFS blob store"
            );
            Arc::new(GridFsBlobStore::new(config.gridfs.clone()))
        }
        other => {
            return Err(BlobError::Configuration(format!(
                "unknown blob backend: {other} (is the feature enabled?)"
            )));
        }
    };

    info!(backend = %config.backend, "blob store initialized");
    Ok(store)
}
