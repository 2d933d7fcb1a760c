//! Storage module for uploaded files
//!
//! Defines the blob store contract used by the session registry and
//! ships an in-memory backend. Nothing here survives a process restart.

mod blob_store;
mod memory_store;

pub use blob_store::{Blob, BlobId, BlobRef, BlobStore, StorageError};
pub use memory_store::InMemoryBlobStore;
