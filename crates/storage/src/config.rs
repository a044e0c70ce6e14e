use std::path::Path;

use serde::Deserialize;
#[cfg(feature = "gridfs")]
use stowage_blob_gridfs::GridFsConfig;

use stowage_blob::BlobError;

use crate::uploader::UploaderConfig;

/// Top-level configuration, loaded from a TOML file.
///
/// # Example
///
/// ```toml
/// [uploader]
/// store_dir = "uploads"
/// grid_fs_access_url = "/image/show"
///
/// [blob]
/// backend = "gridfs"
///
/// [blob.gridfs]
/// grid_fs_host = "localhost"
/// grid_fs_port = 27017
/// grid_fs_database = "media"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct StowageConfig {
    /// Path resolution and public URL configuration.
    #[serde(default)]
    pub uploader: UploaderConfig,
    /// Blob store backend configuration.
    #[serde(default)]
    pub blob: BlobConfig,
}

impl StowageConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(toml: &str) -> Result<Self, BlobError> {
        toml::from_str(toml).map_err(|e| BlobError::Configuration(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BlobError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            BlobError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Configuration for the blob store backend.
#[derive(Debug, Deserialize)]
pub struct BlobConfig {
    /// Which backend to use: `"memory"` or `"gridfs"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// GridFS connection settings, used when `backend = "gridfs"`.
    #[cfg(feature = "gridfs")]
    #[serde(default)]
    pub gridfs: GridFsConfig,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            #[cfg(feature = "gridfs")]
            gridfs: GridFsConfig::default(),
        }
    }
}

fn default_backend() -> String {
    if cfg!(feature = "gridfs") {
        "gridfs".to_owned()
    } else {
        "memory".to_owned()
    }
}
