//! In-memory blob store
//!
//! Keeps every uploaded file in a map guarded by a tokio `RwLock`.
//! Content is shared as `Bytes`, so `get` never copies the payload.

use async_trait::async_trait;
use axum::body::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::blob_store::{Blob, BlobId, BlobRef, BlobStore, StorageError};

#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobId, Blob>>,
}

#[allow(dead_code)]
impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        bytes: Bytes,
        original_name: &str,
        content_type: &str,
    ) -> Result<BlobRef, StorageError> {
        let blob = Blob {
            id: BlobId::new(),
            bytes,
            original_name: original_name.to_string(),
            content_type: content_type.to_string(),
        };
        let blob_ref = blob.to_ref();

        self.blobs.write().await.insert(blob.id, blob);
        debug!(
            "Blob stored: id={}, name={}, size={}",
            blob_ref.id, blob_ref.original_name, blob_ref.size
        );

        Ok(blob_ref)
    }

    async fn get(&self, id: BlobId) -> Result<Blob, StorageError> {
        self.blobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    async fn delete(&self, id: BlobId) -> Result<(), StorageError> {
        if self.blobs.write().await.remove(&id).is_some() {
            debug!("Blob deleted: id={}", id);
        }
        Ok(())
    }
}
