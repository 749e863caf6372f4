//! # Session Registry
//!
//! Each visitor gets a [`SessionContext`] keyed by a random UUID. The registry
//! hands out shared handles; a handler locks a session for the whole of its
//! work, so turns within one session never interleave. Sessions nobody has
//! touched for a while are ended by [`SessionRegistry::sweep_idle`].

use carebot::SessionContext;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// A handle to one session's state.
pub type SharedSession = Arc<Mutex<SessionContext>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `context` under a fresh id.
    pub async fn insert(&self, context: SessionContext) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(context));
        self.sessions.write().await.insert(
            id,
            Entry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session_id = %id, "Session started.");
        (id, session)
    }

    /// Looks a session up and marks it as used.
    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Ends a session. Returns false if the id was unknown.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session_id = %id, "Session ended.");
        }
        removed
    }

    /// Ends every session unused for longer than `max_idle` and returns how
    /// many were ended.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.last_seen.elapsed() <= max_idle;
            if !keep {
                info!(session_id = %id, "Session expired after being idle.");
            }
            keep
        });
        let expired = before - sessions.len();
        debug!(expired, remaining = sessions.len(), "Swept idle sessions.");
        expired
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Sweeps `registry` every `period` until the process exits.
pub async fn expire_idle_sessions(registry: SessionRegistry, max_idle: Duration, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        registry.sweep_idle(max_idle).await;
    }
}
