// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live session registry.
//!
//! Each session's state sits behind its own async mutex. A request holds that
//! lock for the whole turn, so turns within one session run one at a time
//! while different sessions proceed in parallel.
//!
//! Browsers rarely say goodbye, so a session that has not been touched for
//! the idle timeout is discarded. Idle sessions are swept before every
//! `create()` and by a periodic sweeper task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use tanjiro_agent::SessionState;
use tanjiro_core::TanjiroError;
use tanjiro_core::types::SessionId;

/// Shared handle to one session's state.
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Idle timeout used when none is configured.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1800);

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Maps session ids to their state, up to a fixed number of live sessions.
pub struct SessionStore {
    sessions: DashMap<SessionId, Entry>,
    live: AtomicUsize,
    max_sessions: usize,
    max_turns: usize,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, max_turns: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            live: AtomicUsize::new(0),
            max_sessions,
            max_turns,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Sets how long a session may go untouched before it is discarded.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Opens a fresh session, or fails with [`TanjiroError::SessionLimit`].
    pub fn create(&self) -> Result<(SessionId, SessionHandle), TanjiroError> {
        self.evict_idle();

        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_sessions).then_some(n + 1)
            })
            .map_err(|_| TanjiroError::SessionLimit {
                max: self.max_sessions,
            })?;

        let id = SessionId::generate();
        let handle = Arc::new(Mutex::new(SessionState::new(self.max_turns)));
        self.sessions.insert(
            id.clone(),
            Entry {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session_id = %id, live = self.len(), "session created");
        Ok((id, handle))
    }

    /// Looks up a session and marks it as recently used.
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .get_mut(&SessionId(id.to_string()))
            .map(|mut entry| {
                entry.last_seen = Instant::now();
                entry.handle.clone()
            })
    }

    /// Looks up `id`, opening a new session when it is absent or unknown.
    pub fn get_or_create(
        &self,
        id: Option<&str>,
    ) -> Result<(SessionId, SessionHandle), TanjiroError> {
        if let Some(id) = id {
            if let Some(handle) = self.get(id) {
                return Ok((SessionId(id.to_string()), handle));
            }
            debug!(session_id = %id, "unknown session id, opening a new session");
        }
        self.create()
    }

    /// Ends a session. Returns `false` if it did not exist.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.remove(&SessionId(id.to_string())).is_some();
        if removed {
            self.live.fetch_sub(1, Ordering::AcqRel);
            info!(session_id = %id, "session ended");
        }
        removed
    }

    /// Discards every session idle for at least the idle timeout.
    /// Returns how many were discarded.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        self.sessions.retain(|id, entry| {
            let idle = now.saturating_duration_since(entry.last_seen);
            if idle < self.idle_timeout {
                return true;
            }
            debug!(session_id = %id, idle_secs = idle.as_secs(), "session idle, discarding");
            evicted += 1;
            false
        });
        if evicted > 0 {
            self.live.fetch_sub(evicted, Ordering::AcqRel);
            info!(evicted, live = self.len(), "idle sessions discarded");
        }
        evicted
    }

    /// Sweeps idle sessions every `period` until the store is dropped.
    pub fn spawn_idle_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match store.upgrade() {
                    Some(store) => {
                        store.evict_idle();
                    }
                    None => break,
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_remove() {
        let store = SessionStore::new(4, 10);
        let (id, _) = store.create().unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get(id.as_str()).is_some());
        assert!(store.remove(id.as_str()));
        assert!(!store.remove(id.as_str()));
        assert!(store.is_empty());
    }

    #[test]
    fn cap_is_enforced_and_freed_on_remove() {
        let store = SessionStore::new(2, 10);
        let (first, _) = store.create().unwrap();
        store.create().unwrap();

        let err = store.create().unwrap_err();
        assert!(matches!(err, TanjiroError::SessionLimit { max: 2 }));

        store.remove(first.as_str());
        assert!(store.create().is_ok());
    }

    #[test]
    fn unknown_id_opens_new_session() {
        let store = SessionStore::new(4, 10);
        let (id, _) = store.get_or_create(Some("does-not-exist")).unwrap();
        assert_ne!(id.as_str(), "does-not-exist");

        let (again, _) = store.get_or_create(Some(id.as_str())).unwrap();
        assert_eq!(again, id);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new(4, 10);
        let (_, a) = store.create().unwrap();
        let (_, b) = store.create().unwrap();

        a.lock().await.interests.insert("nezuko");
        assert!(b.lock().await.interests.is_empty());
    }

    #[tokio::test]
    async fn state_uses_configured_window() {
        let store = SessionStore::new(1, 7);
        let (_, handle) = store.create().unwrap();
        assert_eq!(handle.lock().await.memory.capacity(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_sessions_are_reclaimed_at_the_cap() {
        let store = SessionStore::new(3, 10).with_idle_timeout(Duration::from_secs(60));
        for _ in 0..3 {
            store.create().unwrap();
        }
        assert!(matches!(
            store.create().unwrap_err(),
            TanjiroError::SessionLimit { max: 3 }
        ));

        tokio::time::advance(Duration::from_secs(61)).await;

        let (fresh, _) = store.create().unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(fresh.as_str()).is_some());
        store.create().unwrap();
        store.create().unwrap();
        assert_eq!(store.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn recently_used_sessions_survive_the_sweep() {
        let store = SessionStore::new(4, 10).with_idle_timeout(Duration::from_secs(60));
        let (active, _) = store.create().unwrap();
        let (stale, _) = store.create().unwrap();

        tokio::time::advance(Duration::from_secs(40)).await;
        assert!(store.get(active.as_str()).is_some());
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(store.evict_idle(), 1);
        assert!(store.get(active.as_str()).is_some());
        assert!(store.get(stale.as_str()).is_none());
        assert!(!store.remove(stale.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_task_discards_idle_sessions() {
        let store = Arc::new(SessionStore::new(4, 10).with_idle_timeout(Duration::from_secs(5)));
        store.create().unwrap();
        store.create().unwrap();

        let sweeper = store.spawn_idle_sweeper(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(11)).await;

        assert!(store.is_empty());
        assert!(store.create().is_ok());
        sweeper.abort();
    }
}
