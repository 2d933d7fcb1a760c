use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::features::sessions::models::Session;
use crate::features::sessions::registry::SessionRegistry;

/// The pending expiry of one specific session
#[derive(Debug, Clone)]
pub struct ExpirationTicket {
    pub session_id: Uuid,
    pub code: String,
    pub deadline: Instant,
}

impl From<&Session> for ExpirationTicket {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            code: session.code.clone(),
            deadline: session.deadline,
        }
    }
}

/// Arm the one-shot expiry timer for `session`.
///
/// The task holds only a weak handle, so dropping the registry lets pending
/// timers finish without keeping it alive.
pub fn schedule(registry: &Arc<SessionRegistry>, session: &Session) {
    let registry = Arc::downgrade(registry);
    let ticket = ExpirationTicket::from(session);

    tokio::spawn(async move {
        tokio::time::sleep_until(ticket.deadline).await;

        match registry.upgrade() {
            Some(registry) => {
                registry.evict(&ticket).await;
            }
            None => debug!(
                "Registry dropped before session {} expired, nothing to evict",
                ticket.code
            ),
        }
    });
}
