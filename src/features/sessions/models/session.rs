use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::modules::storage::BlobRef;

/// Upper bound for a deadline when the configured TTL would overflow the clock
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// One allocated code and the file currently bound to it
#[derive(Debug, Clone)]
pub struct Session {
    /// Identity used by expiration to tell this session apart from any
    /// later session that reuses the same code
    pub id: Uuid,
    pub code: String,
    pub requester_tag: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Monotonic deadline the expiration timer sleeps until
    pub deadline: Instant,
    /// Absent until the first upload
    pub file: Option<BlobRef>,
}

impl Session {
    pub fn new(code: String, requester_tag: String, ttl: Duration) -> Self {
        let ttl = ttl.min(FAR_FUTURE);
        let created_at = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            id: Uuid::new_v4(),
            code,
            requester_tag,
            created_at,
            expires_at,
            deadline: Instant::now() + ttl,
            file: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
