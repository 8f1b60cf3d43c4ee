use crate::actions::ActionContext;
use crate::session::SessionState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// One session behind its own lock.
///
/// The lock is only held to read or patch the record, never across a model
/// call.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Sessions idle longer than this are dropped, uploaded document included.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on live sessions; the least recently used one goes first.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: DEFAULT_IDLE_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

struct Entry {
    session: SharedSession,
    last_touched: Instant,
}

/// Shared application state injected into all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub ctx: ActionContext,
    pub limits: SessionLimits,
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl AppState {
    pub fn new(ctx: ActionContext) -> Self {
        Self::with_limits(ctx, SessionLimits::default())
    }

    pub fn with_limits(ctx: ActionContext, limits: SessionLimits) -> Self {
        Self {
            ctx,
            limits: SessionLimits {
                max_sessions: limits.max_sessions.max(1),
                ..limits
            },
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start an empty session and return its id.
    ///
    /// At the session cap, the least recently touched session is evicted.
    pub async fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;

        while sessions.len() >= self.limits.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, e)| e.last_touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(old) => {
                    sessions.remove(&old);
                    info!(session_id = %old, "Session evicted (cap reached)");
                }
                None => break,
            }
        }

        sessions.insert(
            id,
            Entry {
                session: Arc::new(Mutex::new(SessionState::new())),
                last_touched: Instant::now(),
            },
        );
        id
    }

    /// Look up a session by its textual id and mark it as used.
    pub async fn session(&self, id: &str) -> Option<SharedSession> {
        let id = Uuid::parse_str(id).ok()?;
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// End a session. Returns `false` if it did not exist.
    pub async fn remove_session(&self, id: &str) -> bool {
        let Ok(id) = Uuid::parse_str(id) else {
            return false;
        };
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every session idle for at least `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, e| e.last_touched.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle sessions", evicted);
        }
        evicted
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
