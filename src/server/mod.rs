//! HTTP surface: the index page, the session API and report download.
//!
//! Every browser tab creates its own session. Sessions live in memory until
//! they are deleted, sit idle past [`SessionLimits::idle_ttl`] or are pushed
//! out by the session cap.

pub mod error;
pub mod handlers;
pub mod page;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, SessionLimits};

use crate::error::TalkCvError;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8501";

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/sessions/:id/job-description",
            put(handlers::set_job_description),
        )
        .route("/api/sessions/:id/resume", post(handlers::upload_resume))
        .route(
            "/api/sessions/:id/actions/:action",
            post(handlers::run_session_action),
        )
        .route("/api/sessions/:id/chat", post(handlers::chat))
        .route("/api/sessions/:id/report", get(handlers::download_report))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// How often idle sessions are swept.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), TalkCvError> {
    let sweeper = tokio::spawn(sweep_idle_sessions(state.clone()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(TalkCvError::Server)?;
    info!("Listening on http://{}", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(TalkCvError::Server);
    sweeper.abort();
    result
}

async fn sweep_idle_sessions(state: AppState) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        state.evict_idle(state.limits.idle_ttl).await;
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
