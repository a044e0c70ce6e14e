pub mod error;
pub mod store;
pub mod testing;
pub mod types;

pub use error::BlobError;
pub use store::BlobStore;
pub use types::StoredBlob;
