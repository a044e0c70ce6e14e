use serde::{Deserialize, Serialize};

/// The uploader collaborator: resolves logical paths and the public URL prefix.
///
/// Accessors are read at call time, so an implementation may change what it
/// reports over the lifetime of the handles derived from it.
pub trait Uploader: Send + Sync {
    /// Resolve the logical path for `identifier`.
    fn store_path(&self, identifier: &str) -> String;

    /// Prefix for public URLs of stored files, if files are served at all.
    fn access_url(&self) -> Option<String> {
        None
    }
}

/// Configuration-backed [`Uploader`]: files live under a fixed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    /// Directory prefix for every logical path (e.g. `"uploads"`).
    pub store_dir: String,

    /// Prefix for public URLs (e.g. `"/image/show"`).
    #[serde(alias = "grid_fs_access_url")]
    pub access_url: Option<String>,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            store_dir: String::from("uploads"),
            access_url: None,
        }
    }
}

impl UploaderConfig {
    /// Create an uploader configuration storing files under `store_dir`.
    pub fn new(store_dir: impl Into<String>) -> Self {
        Self {
            store_dir: store_dir.into(),
            access_url: None,
        }
    }

    /// Set the public URL prefix.
    #[must_use]
    pub fn with_access_url(mut self, access_url: impl Into<String>) -> Self {
        self.access_url = Some(access_url.into());
        self
    }
}

impl Uploader for UploaderConfig {
    fn store_path(&self, identifier: &str) -> String {
        let dir = self.store_dir.trim_end_matches('/');
        if dir.is_empty() {
            identifier.to_owned()
        } else {
            format!("{dir}/{identifier}")
        }
    }

    fn access_url(&self) -> Option<String> {
        self.access_url.clone()
    }
}
