//! File storage adapter for uploaded files.
//!
//! [`Storage`] persists uploads into a [`BlobStore`] and hands back
//! [`FileHandle`]s that read, delete and describe the stored blob by its
//! logical path. Paths and public URLs are derived from an [`Uploader`].
//!
//! Two backends are available through [`create_blob_store`]:
//!
//! - **memory** — in-process map, for tests and development
//! - **gridfs** (`gridfs` feature, on by default) — MongoDB GridFS
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), stowage_storage::BlobError> {
//! use stowage_storage::{MemoryFile, Storage, StowageConfig};
//!
//! let config = StowageConfig::from_toml_str(
//!     r#"
//!     [uploader]
//!     store_dir = "uploads"
//!
//!     [blob.gridfs]
//!     grid_fs_host = "localhost"
//!     grid_fs_port = 27017
//!     grid_fs_database = "media"
//!     "#,
//! )?;
//! let storage = Storage::from_config(config)?;
//!
//! let file = MemoryFile::new("this is stuff")
//!     .with_filename("bar.txt")
//!     .with_content_type("text/plain");
//! let handle = storage.store(&file).await?;
//! assert_eq!(handle.logical_path(), "uploads/bar.txt");
//! assert_eq!(handle.read().await?.as_ref(), b"this is stuff");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod factory;
pub mod file;
pub mod handle;
pub mod storage;
pub mod uploader;

pub use config::{BlobConfig, StowageConfig};
pub use factory::create_blob_store;
pub use file::{LocalFile, MemoryFile, UploadFile};
pub use handle::FileHandle;
pub use storage::Storage;
pub use uploader::{Uploader, UploaderConfig};

pub use stowage_blob::{BlobError, BlobStore};
