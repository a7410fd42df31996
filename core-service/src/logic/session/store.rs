//! Session Store - histories keyed by session id
//!
//! The map lock is held only to find, insert or evict a session; each
//! history has its own lock so concurrent sessions never wait on each other.
//!
//! Sessions idle for longer than the TTL are swept on `create` and refused
//! on `get`. When the store is full the least recently used session is
//! evicted to make room.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::history::SessionHistory;
use crate::logic::config::ServiceConfig;

pub type SessionHandle = Arc<Mutex<SessionHistory>>;

#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

struct SessionSlot {
    created_at: DateTime<Utc>,
    last_seen: Mutex<Instant>,
    history: SessionHandle,
}

impl SessionSlot {
    fn idle_since(&self) -> Instant {
        *self.last_seen.lock()
    }

    fn is_expired(&self, ttl: Option<Duration>, now: Instant) -> bool {
        match ttl {
            Some(ttl) => now.saturating_duration_since(self.idle_since()) > ttl,
            None => false,
        }
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionSlot>>,
    history_limit: Option<usize>,
    idle_ttl: Option<Duration>,
    max_sessions: Option<usize>,
}

impl SessionStore {
    /// Store without expiry or capacity limit
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_limit,
            idle_ttl: None,
            max_sessions: None,
        }
    }

    /// Store with the configured history cap, idle TTL and session cap
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.history_limit)
            .with_idle_ttl(config.session_ttl)
            .with_max_sessions(config.max_sessions)
    }

    pub fn with_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn with_max_sessions(mut self, max: Option<usize>) -> Self {
        self.max_sessions = max.filter(|n| *n > 0);
        self
    }

    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    pub fn max_sessions(&self) -> Option<usize> {
        self.max_sessions
    }

    pub fn create(&self) -> SessionInfo {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let now = Instant::now();

        let mut sessions = self.sessions.write();
        let expired = Self::sweep(&mut sessions, self.idle_ttl, now);
        if expired > 0 {
            log::debug!("Evicted {} idle session(s)", expired);
        }

        if let Some(max) = self.max_sessions {
            while sessions.len() >= max {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, slot)| slot.idle_since())
                    .map(|(id, _)| *id);
                match oldest {
                    Some(oldest) => {
                        sessions.remove(&oldest);
                        log::info!("Session {} evicted, store is at capacity ({})", oldest, max);
                    }
                    None => break,
                }
            }
        }

        sessions.insert(
            id,
            SessionSlot {
                created_at,
                last_seen: Mutex::new(now),
                history: Arc::new(Mutex::new(SessionHistory::with_limit(self.history_limit))),
            },
        );
        log::debug!("Session {} created", id);
        SessionInfo { id, created_at }
    }

    /// Live session handle; marks the session as used
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read();
            let slot = sessions.get(id)?;
            if !slot.is_expired(self.idle_ttl, now) {
                *slot.last_seen.lock() = now;
                return Some(Arc::clone(&slot.history));
            }
        }

        // Expired: drop it unless another request revived it meanwhile
        let mut sessions = self.sessions.write();
        if sessions
            .get(id)
            .is_some_and(|slot| slot.is_expired(self.idle_ttl, now))
        {
            sessions.remove(id);
            log::debug!("Session {} expired", id);
        }
        None
    }

    pub fn info(&self, id: &Uuid) -> Option<SessionInfo> {
        let now = Instant::now();
        self.sessions
            .read()
            .get(id)
            .filter(|slot| !slot.is_expired(self.idle_ttl, now))
            .map(|slot| SessionInfo {
                id: *id,
                created_at: slot.created_at,
            })
    }

    /// Drop a session and its history; false if it did not exist
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            log::debug!("Session {} removed", id);
        }
        removed
    }

    /// Drop every session idle past the TTL as of `now`; returns how many
    pub fn evict_idle(&self, now: Instant) -> usize {
        Self::sweep(&mut self.sessions.write(), self.idle_ttl, now)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    fn sweep(sessions: &mut HashMap<Uuid, SessionSlot>, ttl: Option<Duration>, now: Instant) -> usize {
        if ttl.is_none() {
            return 0;
        }
        let before = sessions.len();
        sessions.retain(|_, slot| !slot.is_expired(ttl, now));
        before - sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}
