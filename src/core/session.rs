//! In-memory session store
//!
//! Each browser session owns one [`Conversation`], keyed by a random id that
//! travels in the `parley_session` cookie. Nothing here survives a restart.
//! Idle sessions are dropped once they outlive the configured TTL.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::conversation::Conversation;

pub const SESSION_COOKIE: &str = "parley_session";

/// Shared handle to one session's history
pub type ConversationHandle = Arc<Mutex<Conversation>>;

struct Session {
    conversation: ConversationHandle,
    last_seen: DateTime<Utc>,
}

/// Per-request view of the caller's session
#[derive(Clone)]
pub struct SessionContext {
    pub id: Uuid,
    pub conversation: ConversationHandle,
    /// True when no live session matched the request cookie
    pub is_new: bool,
}

impl SessionContext {
    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, self.id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    /// `None` keeps sessions until cleared
    ttl: Option<Duration>,
}

impl SessionStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Look up the session for `id`, or open a fresh one when it is missing
    /// or expired.
    pub async fn resolve(&self, id: Option<Uuid>) -> SessionContext {
        self.resolve_at(id, Utc::now()).await
    }

    async fn resolve_at(&self, id: Option<Uuid>, now: DateTime<Utc>) -> SessionContext {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(session) = sessions.get_mut(&id) {
                if !self.is_expired(session, now) {
                    session.last_seen = now;
                    return SessionContext {
                        id,
                        conversation: session.conversation.clone(),
                        is_new: false,
                    };
                }
                tracing::debug!(session = %id, "session expired");
                sessions.remove(&id);
            }
        }

        let id = Uuid::new_v4();
        let conversation: ConversationHandle = Arc::new(Mutex::new(Conversation::new()));
        sessions.insert(
            id,
            Session {
                conversation: conversation.clone(),
                last_seen: now,
            },
        );
        tracing::debug!(session = %id, "opened session");

        SessionContext {
            id,
            conversation,
            is_new: true,
        }
    }

    /// Forget a session and its conversation
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    #[cfg(test)]
    pub async fn conversation(&self, id: Uuid) -> Option<ConversationHandle> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|s| s.conversation.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session idle for longer than the TTL
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        before - sessions.len()
    }

    /// Periodically purge expired sessions until the runtime shuts down
    pub fn spawn_sweeper(&self, every: Duration) -> Option<JoinHandle<()>> {
        if self.ttl.is_none() {
            return None;
        }
        let store = self.clone();
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let purged = store.purge_expired().await;
                if purged > 0 {
                    let active = store.len().await;
                    tracing::info!(purged, active, "purged idle sessions");
                }
            }
        }))
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        now.signed_duration_since(session.last_seen)
            .to_std()
            .map(|idle| idle > ttl)
            .unwrap_or(false)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);
        let requested = CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok());

        Ok(store.resolve(requested).await)
    }
}
