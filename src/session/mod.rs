// src/session/mod.rs
// Per-client selection state, keyed by session ID

mod cookie;

pub use cookie::{SESSION_COOKIE, SessionId};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::selector::CategoryState;

/// Everything a session remembers: one `CategoryState` per category name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub categories: HashMap<String, CategoryState>,
}

impl SessionRecord {
    /// State for a category, empty if the session never drew from it
    pub fn state_for(&self, category: &str) -> CategoryState {
        self.categories.get(category).cloned().unwrap_or_default()
    }

    pub fn set_state(&mut self, category: &str, state: CategoryState) {
        self.categories.insert(category.to_string(), state);
    }
}

/// Backing storage for session records.
///
/// `load` followed by `save` is not atomic; concurrent requests on the same
/// session resolve as last-writer-wins.
pub trait SessionStore: Send + Sync {
    fn load(&self, session_id: &str) -> SessionRecord;
    fn save(&self, session_id: &str, record: SessionRecord);
}

/// Sweep roughly one save in ten
const SWEEP_THRESHOLD: u8 = 26;

struct SessionEntry {
    record: SessionRecord,
    last_access: DateTime<Utc>,
}

/// Process-local session store with idle expiry
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored sessions, expired ones included until swept
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every session idle for longer than the TTL; returns how many went
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.lock();
        Self::sweep(&mut sessions, Utc::now() - self.ttl)
    }

    fn sweep(sessions: &mut HashMap<String, SessionEntry>, cutoff: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access > cutoff);
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, remaining = sessions.len(), "Expired sessions swept");
        }
        removed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        // A panic mid-update leaves at worst one stale record behind
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    fn backdate(&self, session_id: &str, by: Duration) {
        if let Some(entry) = self.lock().get_mut(session_id) {
            entry.last_access = entry.last_access - by;
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, session_id: &str) -> SessionRecord {
        let cutoff = Utc::now() - self.ttl;
        match self.lock().get(session_id) {
            Some(entry) if entry.last_access > cutoff => entry.record.clone(),
            _ => SessionRecord::default(),
        }
    }

    fn save(&self, session_id: &str, record: SessionRecord) {
        let now = Utc::now();
        let mut sessions = self.lock();
        if rand::random::<u8>() < SWEEP_THRESHOLD {
            Self::sweep(&mut sessions, now - self.ttl);
        }
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                record,
                last_access: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn record_with(category: &str, used: &[usize], last: usize) -> SessionRecord {
        let mut record = SessionRecord::default();
        record.set_state(
            category,
            CategoryState {
                used: used.iter().copied().collect(),
                last: Some(last),
            },
        );
        record
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let store = MemorySessionStore::default();
        assert_eq!(store.load("nobody"), SessionRecord::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemorySessionStore::default();
        store.save("s1", record_with("A", &[0, 2], 2));

        let loaded = store.load("s1");
        let state = loaded.state_for("A");
        assert_eq!(state.used, BTreeSet::from([0, 2]));
        assert_eq!(state.last, Some(2));
        assert_eq!(loaded.state_for("B"), CategoryState::default());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = MemorySessionStore::default();
        store.save("s1", record_with("A", &[1], 1));
        assert_eq!(store.load("s2"), SessionRecord::default());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expired_session_loads_empty() {
        let store = MemorySessionStore::new(Duration::minutes(30));
        store.save("s1", record_with("A", &[0], 0));
        store.backdate("s1", Duration::minutes(31));
        assert_eq!(store.load("s1"), SessionRecord::default());
    }

    #[test]
    fn test_purge_expired() {
        let store = MemorySessionStore::new(Duration::minutes(30));
        store.save("old", record_with("A", &[0], 0));
        store.save("fresh", record_with("A", &[1], 1));
        store.backdate("old", Duration::hours(2));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("fresh").state_for("A").last, Some(1));
    }

    #[test]
    fn test_record_json_shape() {
        let record = record_with("A", &[3], 3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["categories"]["A"]["used"], serde_json::json!([3]));
        assert_eq!(json["categories"]["A"]["last"], 3);
    }
}
