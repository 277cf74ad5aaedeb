//! Cookie-keyed in-memory session store
//!
//! Each browser gets a random id in the `bookwise_session` cookie. The id
//! maps to a [`SessionState`] that handlers read and update explicitly.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bookwise_common::session::SessionState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;

pub const SESSION_COOKIE: &str = "bookwise_session";

/// Session id attached to each page request by [`session_middleware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

struct Entry {
    last_seen: Instant,
    state: SessionState,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Resume a live session or start a new one
    ///
    /// Returns the session id and whether it was just created. Idle sessions
    /// are pruned whenever a new one is created.
    pub async fn resume_or_create(&self, id: Option<Uuid>) -> (Uuid, bool) {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                if entry.last_seen.elapsed() < self.idle_timeout {
                    entry.last_seen = Instant::now();
                    return (id, false);
                }
            }
        }

        let before = sessions.len();
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < idle_timeout);
        if sessions.len() < before {
            debug!("Pruned {} idle sessions", before - sessions.len());
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            Entry {
                last_seen: Instant::now(),
                state: SessionState::new(),
            },
        );
        (id, true)
    }

    /// Copy of the session's state (empty state for unknown ids)
    pub async fn snapshot(&self, id: SessionId) -> SessionState {
        self.sessions
            .read()
            .await
            .get(&id.0)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    /// Run `f` against the session's state under the write lock
    pub async fn update<R>(&self, id: SessionId, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(id.0).or_insert_with(|| Entry {
            last_seen: Instant::now(),
            state: SessionState::new(),
        });
        entry.last_seen = Instant::now();
        f(&mut entry.state)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Attach a [`SessionId`] to the request, issuing the cookie for new sessions
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let (id, created) = state.sessions.resume_or_create(existing).await;
    request.extensions_mut().insert(SessionId(id));

    let response = next.run(request).await;
    if !created {
        return response;
    }

    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response).into_response()
}
