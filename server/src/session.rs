//! Cookie-keyed session storage.
//!
//! # Design
//! Each client gets a random UUID in a cookie; the id keys a `Session`
//! holding that client's `ListStore` and pending flash messages. The map
//! lives in the router state behind one `RwLock`. Request handlers hold the
//! write guard for their whole read-modify-write, so two requests on the
//! same session never interleave and id allocation stays race-free.
//!
//! A session ends once it has been idle longer than `SessionLimits::idle`.
//! Expired entries are swept whenever a new session is created, and the map
//! never grows past `SessionLimits::max_sessions`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::RwLock;
use tokio::time::Instant;
use todo_core::{Flash, ListStore};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::AppState;

/// Everything kept for one client between requests.
#[derive(Debug)]
pub struct Session {
    pub store: ListStore,
    pub flash: Flash,
    pub last_seen: Instant,
}

impl Session {
    pub fn new(now: Instant) -> Self {
        Self {
            store: ListStore::new(),
            flash: Flash::default(),
            last_seen: now,
        }
    }

    /// Hand out the pending messages; they are shown once.
    pub fn take_flash(&mut self) -> Flash {
        std::mem::take(&mut self.flash)
    }

    pub fn is_expired(&self, now: Instant, idle: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= idle
    }
}

pub type Sessions = Arc<RwLock<HashMap<Uuid, Session>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub idle: Duration,
    pub max_sessions: usize,
}

impl From<&ServerConfig> for SessionLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            idle: config.session_idle,
            max_sessions: config.max_sessions.max(1),
        }
    }
}

/// The session resolved for the current request, placed in request
/// extensions by [`session_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl CookieSettings {
    fn header_value(&self, id: Uuid) -> Option<HeaderValue> {
        let secure = if self.secure { "; Secure" } else { "" };
        let raw = format!("{}={id}; Path=/; HttpOnly; SameSite=Lax{secure}", self.name);
        HeaderValue::from_str(&raw).ok()
    }
}

/// Find the session id in the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Look up the presented session and mark it seen, or start a new one.
///
/// Returns the id to use and whether it was freshly created. A presented id
/// that is unknown or idle past `limits.idle` counts as absent.
pub fn resolve_session(
    sessions: &mut HashMap<Uuid, Session>,
    presented: Option<Uuid>,
    limits: SessionLimits,
    now: Instant,
) -> (Uuid, bool) {
    if let Some(id) = presented {
        if let Some(session) = sessions.get_mut(&id) {
            if !session.is_expired(now, limits.idle) {
                session.last_seen = now;
                return (id, false);
            }
        }
    }

    let before = sessions.len();
    sessions.retain(|_, session| !session.is_expired(now, limits.idle));
    while sessions.len() >= limits.max_sessions {
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
    let evicted = before - sessions.len();
    if evicted > 0 {
        debug!(evicted, live = sessions.len(), "sessions evicted");
    }

    let id = Uuid::new_v4();
    sessions.insert(id, Session::new(now));
    (id, true)
}

/// Resolve or create the caller's session before the handler runs.
///
/// An absent cookie, or one naming a session this process does not know
/// or has expired, starts a fresh empty session and sets the cookie on the
/// response.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let presented = session_id_from_headers(request.headers(), &state.cookie.name);
    let (id, fresh) = {
        let mut sessions = state.sessions.write().await;
        resolve_session(&mut sessions, presented, state.limits, Instant::now())
    };

    tracing::Span::current().record("session", short(id).as_str());
    if fresh {
        debug!("session started");
    }

    request.extensions_mut().insert(SessionId(id));
    let mut response = next.run(request).await;

    if fresh {
        match state.cookie.header_value(id) {
            Some(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            None => warn!(cookie = %state.cookie.name, "session cookie name is not a valid header value"),
        }
    }
    response
}

/// First block of a UUID, enough to follow one client through the logs.
pub fn short(id: Uuid) -> String {
    let mut text = id.simple().to_string();
    text.truncate(8);
    text
}
