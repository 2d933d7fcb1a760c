#[cfg(test)]
use crate::core::config::{SessionConfig, UploadConfig};
#[cfg(test)]
use crate::features::sessions::{KeyGenerator, SessionRegistry};
#[cfg(test)]
use crate::features::transfers::TransferService;
#[cfg(test)]
use crate::modules::storage::InMemoryBlobStore;
#[cfg(test)]
use std::sync::Arc;

/// Transfer service over an in-memory store with default session and upload settings
#[cfg(test)]
pub fn test_service() -> (Arc<TransferService>, Arc<InMemoryBlobStore>) {
    test_service_with(UploadConfig::default())
}

#[cfg(test)]
pub fn test_service_with(
    upload: UploadConfig,
) -> (Arc<TransferService>, Arc<InMemoryBlobStore>) {
    let session = SessionConfig::default();
    let store = Arc::new(InMemoryBlobStore::new());
    let registry = SessionRegistry::new(
        KeyGenerator::new(&session.alphabet, session.code_length).unwrap(),
        store.clone(),
        session.ttl,
    );
    let service = Arc::new(TransferService::new(registry, store.clone(), upload));
    (service, store)
}
