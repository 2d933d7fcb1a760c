use async_trait::async_trait;
use axum::body::Bytes;
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a stored blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobId(Uuid);

impl BlobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored file: raw content plus the metadata captured at upload time
#[derive(Debug, Clone)]
pub struct Blob {
    pub id: BlobId,
    pub bytes: Bytes,
    pub original_name: String,
    pub content_type: String,
}

impl Blob {
    /// Lightweight reference to this blob, without the content
    pub fn to_ref(&self) -> BlobRef {
        BlobRef {
            id: self.id,
            original_name: self.original_name.clone(),
            content_type: self.content_type.clone(),
            size: self.bytes.len(),
        }
    }
}

/// Reference held by a session to the blob bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub id: BlobId,
    pub original_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Blob not found: {0}")]
    NotFound(BlobId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Id-addressed storage of uploaded files.
///
/// Implementations never inspect the bytes. `delete` must be idempotent:
/// removing an id that is already gone is not an error.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a file and return the reference to it
    async fn put(
        &self,
        bytes: Bytes,
        original_name: &str,
        content_type: &str,
    ) -> Result<BlobRef, StorageError>;

    /// Fetch a stored file
    async fn get(&self, id: BlobId) -> Result<Blob, StorageError>;

    /// Remove a stored file
    async fn delete(&self, id: BlobId) -> Result<(), StorageError>;
}
