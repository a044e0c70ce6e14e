//! MongoDB GridFS backend for the Stowage blob store.
//!
//! Blobs are stored as GridFS files whose `filename` is the logical path.
//! Writing to an existing path adds a new revision; reads and content-type
//! lookups see the newest revision, and deletes remove every revision.
//!
//! The database handle is opened lazily by [`GridFsConnection`] on the first
//! operation and cached for the lifetime of the store.

pub mod config;
pub mod connection;
pub mod error;
mod store;

pub use config::GridFsConfig;
pub use connection::GridFsConnection;
pub use store::GridFsBlobStore;
