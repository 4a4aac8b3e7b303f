//! Per-user session registry
//!
//! One `ConversationSession` per session id. Each session sits behind its
//! own mutex, so exchanges on a session run one at a time while different
//! sessions proceed independently.
//!
//! Clients should DELETE sessions they are done with. Sessions nobody has
//! touched for `idle_timeout` are swept whenever a new session is inserted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::session::ConversationSession;

pub type SharedSession = Arc<Mutex<ConversationSession>>;

pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(60 * 60);

struct Entry {
    session: SharedSession,
    last_used: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_SESSION_IDLE)
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn insert(&self, id: String, session: ConversationSession) -> SharedSession {
        let shared = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_used.elapsed() < self.idle_timeout);
        if sessions.len() < before {
            debug!("Evicted {} idle sessions", before - sessions.len());
        }

        sessions.insert(
            id,
            Entry {
                session: Arc::clone(&shared),
                last_used: Instant::now(),
            },
        );
        shared
    }

    /// Look up a session and mark it as used
    pub async fn get(&self, id: &str) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_used = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// Drop a session; returns whether it existed
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::persona::PersonaCatalog;
    use crate::provider::{ChatGateway, GenerationContext};
    use crate::resolver::{ModelPolicy, ModelResolver};
    use crate::session::Message;
    use async_trait::async_trait;

    struct NoopGateway;

    #[async_trait]
    impl ChatGateway for NoopGateway {
        async fn generate(
            &self,
            _context: &GenerationContext,
            _history: &[Message],
            _new_message: &str,
        ) -> Result<String, GenerationError> {
            Ok(String::new())
        }

        fn name(&self) -> &'static str {
            "noop"
        }
    }

    fn session() -> ConversationSession {
        ConversationSession::new(
            Arc::new(ModelResolver::new(ModelPolicy::default())),
            Arc::new(PersonaCatalog::new()),
            Arc::new(NoopGateway),
        )
    }

    #[tokio::test]
    async fn test_idle_sessions_swept_on_insert() {
        let store = SessionStore::with_idle_timeout(Duration::from_millis(50));
        store.insert("old".into(), session()).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        store.insert("new".into(), session()).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get("old").await.is_none());
        assert!(store.get("new").await.is_some());
    }

    #[tokio::test]
    async fn test_recent_sessions_kept() {
        let store = SessionStore::new();
        store.insert("a".into(), session()).await;
        store.insert("b".into(), session()).await;
        assert_eq!(store.len().await, 2);

        assert!(store.remove("a").await);
        assert!(!store.remove("a").await);
        assert_eq!(store.len().await, 1);
    }
}
