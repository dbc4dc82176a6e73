pub mod blob_store;

pub use blob_store::{BlobStore, StoredBlob, DEFAULT_BLOB_TTL};
