use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use counsel_core::{update, ChatState, ChatViewModel, Effect, Msg};
use engine_logging::engine_info;
use uuid::Uuid;

pub type SessionId = Uuid;

const MAX_SESSIONS: usize = 1024;
const IDLE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

struct Session {
    state: ChatState,
    last_seen: Instant,
}

/// Chat state for every browser session, keyed by the session cookie.
///
/// Sessions are only created when a message is submitted. The lock is only
/// held while `update` runs; effects execute outside it.
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(MAX_SESSIONS, IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    /// Returns `id` if it names a live session.
    pub fn lookup(&self, id: Option<SessionId>) -> Option<SessionId> {
        let id = id?;
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id)?;
        session.last_seen = Instant::now();
        Some(id)
    }

    /// Starts a fresh session. Idle sessions are dropped first, then the
    /// least recently seen ones while the store is full.
    pub fn create(&self) -> SessionId {
        let now = Instant::now();
        let mut sessions = self.lock();

        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_seen) < self.idle_ttl);
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }
        if sessions.len() < before {
            engine_info!("Evicted {} session(s)", before - sessions.len());
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            Session {
                state: ChatState::new(),
                last_seen: now,
            },
        );
        id
    }

    /// Applies `msg` to the session and returns the effects to run.
    pub fn dispatch(&self, id: SessionId, msg: Msg) -> Vec<Effect> {
        let mut sessions = self.lock();
        let Some(session) = sessions.get_mut(&id) else {
            return Vec::new();
        };
        let state = std::mem::take(&mut session.state);
        let (state, effects) = update(state, msg);
        session.state = state;
        session.last_seen = Instant::now();
        effects
    }

    pub fn view(&self, id: SessionId) -> Option<ChatViewModel> {
        self.lock().get(&id).map(|session| session.state.view())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn with_state<T>(&self, id: SessionId, f: impl FnOnce(&ChatState) -> T) -> Option<T> {
        self.lock().get(&id).map(|session| f(&session.state))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        // A panic mid-update leaves the map itself intact.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
