//! In-memory registry of active sessions.
//!
//! Every lifecycle transition reads and writes session state through
//! [`SessionRegistry::with_session`], which runs a synchronous closure
//! under the registry lock. Callers claim a transition inside the closure
//! and perform platform or backend I/O only after the lock is released.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use super::election::Election;
use crate::models::session::{MatchSession, SessionState};

/// A registered session and its running election, if any.
#[derive(Debug)]
pub struct SessionEntry {
    /// The session.
    pub session: MatchSession,
    /// Election currently collecting ballots.
    pub election: Option<Election>,
}

impl SessionEntry {
    /// Wrap a freshly formed session.
    #[must_use]
    pub fn new(session: MatchSession) -> Self {
        Self {
            session,
            election: None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<String, SessionEntry>,
    forming_lobbies: HashSet<String>,
}

/// Process-lifetime session store.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: Mutex<Inner>,
    channel_counter: AtomicU64,
}

impl SessionRegistry {
    /// Next value of the running counter used in channel names.
    pub fn next_channel_number(&self) -> u64 {
        self.channel_counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Reserve a lobby while a session is being formed from it.
    ///
    /// Returns `false` if the lobby is already being processed.
    pub async fn claim_lobby(&self, lobby_id: &str) -> bool {
        self.inner
            .lock()
            .await
            .forming_lobbies
            .insert(lobby_id.to_owned())
    }

    /// Release a lobby reservation.
    pub async fn release_lobby(&self, lobby_id: &str) {
        self.inner.lock().await.forming_lobbies.remove(lobby_id);
    }

    /// Whether any member of `user_ids` is still voting in a session that
    /// has not settled its host yet.
    ///
    /// Sessions past host selection do not count: their members are free to
    /// queue again even if the result never arrives.
    pub async fn any_engaged(&self, user_ids: &[String]) -> bool {
        let guard = self.inner.lock().await;
        guard
            .sessions
            .values()
            .filter(|entry| entry.session.state.is_cancellable())
            .any(|entry| user_ids.iter().any(|id| entry.session.is_member(id)))
    }

    /// Register a session.
    pub async fn insert(&self, entry: SessionEntry) {
        let id = entry.session.id.clone();
        self.inner.lock().await.sessions.insert(id, entry);
    }

    /// Run `f` against a session under the registry lock.
    ///
    /// Returns `None` when no session with `session_id` is registered.
    pub async fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionEntry) -> R,
    ) -> Option<R> {
        let mut guard = self.inner.lock().await;
        guard.sessions.get_mut(session_id).map(f)
    }

    /// Remove a session, aborting its election timer.
    pub async fn remove(&self, session_id: &str) -> Option<SessionEntry> {
        let entry = self.inner.lock().await.sessions.remove(session_id);
        if let Some(election) = entry.as_ref().and_then(|e| e.election.as_ref()) {
            election.abort();
        }
        entry
    }

    /// Drop a session still waiting for its result. Sessions in any other
    /// state are left alone.
    pub async fn evict_unfinished(&self, session_id: &str) -> Option<SessionEntry> {
        let mut guard = self.inner.lock().await;
        let waiting = guard.sessions.get(session_id).is_some_and(|entry| {
            matches!(
                entry.session.state,
                SessionState::TeamSplit | SessionState::Active
            )
        });
        if !waiting {
            return None;
        }
        guard.sessions.remove(session_id)
    }

    /// Find the oldest session awaiting a result whose member set equals
    /// `user_ids` exactly, and move it to `ReportWindow`.
    ///
    /// Returns a snapshot of the claimed session.
    pub async fn claim_result(&self, user_ids: &HashSet<String>) -> Option<MatchSession> {
        let mut guard = self.inner.lock().await;
        let entry = guard
            .sessions
            .values_mut()
            .filter(|entry| {
                matches!(
                    entry.session.state,
                    SessionState::TeamSplit | SessionState::Active
                )
            })
            .filter(|entry| {
                let members = entry.session.member_set();
                members.len() == user_ids.len()
                    && user_ids.iter().all(|id| members.contains(id.as_str()))
            })
            .min_by_key(|entry| entry.session.created_at)?;
        entry.session.transition(SessionState::ReportWindow).ok()?;
        Some(entry.session.clone())
    }

    /// Clone of a registered session.
    pub async fn snapshot(&self, session_id: &str) -> Option<MatchSession> {
        self.with_session(session_id, |entry| entry.session.clone())
            .await
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    /// Whether no session is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
