//! Session registry
//!
//! Owns every live code and the file bound to it. All mutation of the
//! session map happens under a single write guard: allocation checks and
//! inserts in one step, binding swaps the file reference in one step.
//! Blob store calls always run after the guard is released.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::features::sessions::expiration::{self, ExpirationTicket};
use crate::features::sessions::key_generator::KeyGenerator;
use crate::features::sessions::models::Session;
use crate::modules::storage::{BlobId, BlobRef, BlobStore};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Unknown, expired, or (for `resolve`) not yet bound
    #[error("Code not found")]
    NotFound,

    #[error("No free code found after {attempts} attempts")]
    CapacityExhausted { attempts: usize },
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
    key_generator: KeyGenerator,
    blob_store: Arc<dyn BlobStore>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(
        key_generator: KeyGenerator,
        blob_store: Arc<dyn BlobStore>,
        ttl: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            key_generator,
            blob_store,
            ttl,
        })
    }

    /// Mint a new code and start its lifetime.
    ///
    /// Draws at most `live + 1` candidates before giving up.
    pub async fn allocate(self: &Arc<Self>, requester_tag: &str) -> Result<String, RegistryError> {
        let session = {
            let mut sessions = self.sessions.write().await;
            let live = sessions.len();

            if live >= self.key_generator.capacity() {
                warn!("Key space exhausted: {} live sessions", live);
                return Err(RegistryError::CapacityExhausted { attempts: 0 });
            }

            let attempts = live + 1;
            let code = (0..attempts)
                .map(|_| self.key_generator.generate())
                .find(|candidate| !sessions.contains_key(candidate))
                .ok_or_else(|| {
                    warn!(
                        "No free code after {} attempts ({} live sessions)",
                        attempts, live
                    );
                    RegistryError::CapacityExhausted { attempts }
                })?;

            let session = Session::new(code.clone(), requester_tag.to_string(), self.ttl);
            sessions.insert(code, session.clone());
            session
        };

        expiration::schedule(self, &session);

        info!(
            "Session allocated: code={}, requester={}, expires_at={}",
            session.code, session.requester_tag, session.expires_at
        );

        Ok(session.code)
    }

    /// Attach `file` to `code`, replacing and releasing any previous file.
    ///
    /// Returns the session as it stood right after the bind.
    pub async fn bind(&self, code: &str, file: BlobRef) -> Result<Session, RegistryError> {
        let code = self.key_generator.normalize(code);
        let file_id = file.id;

        let (snapshot, previous) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions
                .get_mut(&code)
                .filter(|session| !session.is_expired())
                .ok_or(RegistryError::NotFound)?;

            let previous = session.file.replace(file);
            (session.clone(), previous)
        };

        match previous {
            Some(previous) => {
                info!(
                    "File replaced: code={}, old={}, new={}",
                    code, previous.id, file_id
                );
                self.release(previous.id, &code).await;
            }
            None => info!("File bound: code={}, blob={}", code, file_id),
        }

        Ok(snapshot)
    }

    /// Snapshot of the session bound to `code`.
    ///
    /// Unknown, expired and unbound codes all report `NotFound`.
    pub async fn resolve(&self, code: &str) -> Result<Session, RegistryError> {
        self.lookup(code)
            .await
            .ok()
            .filter(|session| session.file.is_some())
            .ok_or(RegistryError::NotFound)
    }

    /// Snapshot of a live session whether or not a file is bound yet
    pub async fn lookup(&self, code: &str) -> Result<Session, RegistryError> {
        let code = self.key_generator.normalize(code);

        self.sessions
            .read()
            .await
            .get(&code)
            .filter(|session| !session.is_expired())
            .cloned()
            .ok_or(RegistryError::NotFound)
    }

    /// Destroy a session and its file ahead of its expiry
    pub async fn remove(&self, code: &str) -> Result<(), RegistryError> {
        let code = self.key_generator.normalize(code);

        let session = self
            .sessions
            .write()
            .await
            .remove(&code)
            .ok_or(RegistryError::NotFound)?;

        if let Some(file) = &session.file {
            self.release(file.id, &code).await;
        }

        if session.is_expired() {
            return Err(RegistryError::NotFound);
        }

        info!("Session removed: code={}", code);
        Ok(())
    }

    /// Expire the session named by `ticket`.
    ///
    /// Does nothing unless the stored session is the very one the ticket
    /// was issued for. Returns whether a session was evicted.
    pub(crate) async fn evict(&self, ticket: &ExpirationTicket) -> bool {
        let evicted = {
            let mut sessions = self.sessions.write().await;
            let is_current = sessions
                .get(&ticket.code)
                .is_some_and(|session| session.id == ticket.session_id);

            if is_current {
                sessions.remove(&ticket.code)
            } else {
                None
            }
        };

        match evicted {
            Some(session) => {
                if let Some(file) = &session.file {
                    self.release(file.id, &session.code).await;
                }
                info!("Session expired: code={}", session.code);
                true
            }
            None => {
                debug!(
                    "Expiry for session {} ({}) skipped, already gone",
                    ticket.session_id, ticket.code
                );
                false
            }
        }
    }

    pub async fn live_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Best-effort blob cleanup; failures are logged and swallowed
    async fn release(&self, blob_id: BlobId, code: &str) {
        if let Err(e) = self.blob_store.delete(blob_id).await {
            warn!(
                "Failed to delete blob {} released by code {}: {}",
                blob_id, code, e
            );
        }
    }
}
