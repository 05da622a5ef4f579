//! HTTP front end for session-scoped todo lists.
//!
//! # Overview
//! An axum router over `todo_core`. Every request is tied to a cookie
//! session; the session's `ListStore` is lent to a `RequestHandler` and the
//! returned `Decision` becomes a redirect, a JSON view, a bare path or an
//! empty 204.

pub mod config;
mod request_tracing;
pub mod routes;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

pub use config::{ConfigError, ServerConfig};
pub use routes::{ListPage, ListsPage};
pub use session::{CookieSettings, Session, SessionId, SessionLimits, Sessions};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Sessions,
    pub cookie: Arc<CookieSettings>,
    pub limits: SessionLimits,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            cookie: Arc::new(CookieSettings {
                name: config.session_cookie.clone(),
                secure: config.secure_cookie,
            }),
            limits: SessionLimits::from(config),
        }
    }

    /// Run `f` against one session while holding the write lock. When the
    /// session cap is tiny, a concurrent request can evict the session
    /// between the middleware and the handler; it is started again empty.
    pub async fn with_session<R, F>(&self, id: Uuid, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        f(sessions.entry(id).or_insert_with(|| Session::new(Instant::now())))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

pub fn app() -> Router {
    router(AppState::new(&ServerConfig::default()))
}

/// Session-backed routes sit behind the session layer; `/` only redirects
/// and never opens a session. Tracing wraps everything.
pub fn router(state: AppState) -> Router {
    routes::routes()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ))
        .merge(routes::public_routes())
        .layer(middleware::from_fn(request_tracing::request_tracing_middleware))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    let app = router(AppState::new(config));
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, cookie = %config.session_cookie, "todo server listening");
    }
    axum::serve(listener, app).await
}
