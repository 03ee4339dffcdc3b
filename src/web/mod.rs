mod auth;
pub mod flash;
pub mod pages;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::FromRef;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::{run_cleanup_worker, AuthProvider, SessionStore};
use crate::backend::{BackendApi, Gateway};
use crate::config::Config;
use crate::views::Views;

/// What every handler can reach: configuration, the backend client, the
/// signed-in sessions and the live page views.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: BackendApi,
    pub sessions: SessionStore,
    pub views: Arc<Views>,
}

impl AppState {
    /// Wire the backend client, page views and session table together.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config, provider: Arc<dyn AuthProvider>) -> Result<Self, reqwest::Error> {
        let api = BackendApi::new(Gateway::new(&config)?);
        let views = Arc::new(Views::new(&api, &config));
        Ok(Self {
            config: Arc::new(config),
            api,
            sessions: SessionStore::new(provider),
            views,
        })
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

/// Serve the dashboard until `shutdown` resolves, then stop the session
/// cleanup worker and every page's refresh timer.
///
/// # Errors
///
/// Returns an error if the address is invalid, the port cannot be bound or
/// the server stops abnormally.
pub async fn serve(state: AppState, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let host = &state.config.web_host;
    let addr: SocketAddr = format!("{host}:{}", state.config.web_port)
        .parse()
        .with_context(|| format!("Invalid WEB_HOST/WEB_PORT: {host}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let views = Arc::clone(&state.views);
    let stop_workers = CancellationToken::new();
    let cleanup = tokio::spawn(run_cleanup_worker(
        state.sessions.clone(),
        Arc::clone(&views),
        state.config.session_cleanup_interval,
        stop_workers.clone(),
    ));

    info!(%addr, "Admin dashboard listening");
    let served = axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error");

    stop_workers.cancel();
    if let Err(e) = cleanup.await {
        warn!(error = %e, "Session cleanup worker panicked");
    }
    views.deactivate_all().await;
    served
}

/// Every dashboard page, the auth pages and the stylesheet.
pub fn create_app(state: AppState) -> Router {
    let assets = static_dir(state.config.static_dir.as_deref());
    debug!(dir = %assets.display(), "Serving stylesheet");

    Router::new()
        .merge(routes::router())
        .merge(auth::router())
        .nest_service("/static", ServeDir::new(assets))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The configured directory if any, else `./static` next to the working
/// directory, else the packaged location.
fn static_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    let local = PathBuf::from("static");
    if local.is_dir() {
        return local;
    }
    let packaged = PathBuf::from("/usr/share/filxconnect-admin/static");
    if packaged.is_dir() {
        packaged
    } else {
        local
    }
}
