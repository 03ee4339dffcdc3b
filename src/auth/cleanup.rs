//! Background worker that purges expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::session::SessionStore;
use crate::views::Views;

/// Purge once. When the purge leaves nobody signed in, every page's refresh
/// timer is stopped.
async fn cleanup_once(sessions: &SessionStore, views: &Views) -> usize {
    let purged = sessions.purge_expired();
    if purged > 0 {
        tracing::info!(expired_sessions = purged, "Cleaned up expired sessions");
        if sessions.is_empty() {
            tracing::info!("No admin signed in, stopping page refresh");
            views.deactivate_all().await;
        }
    }
    purged
}

/// Run the cleanup worker until `shutdown` is cancelled.
pub async fn run_cleanup_worker(
    sessions: SessionStore,
    views: Arc<Views>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Starting session cleanup worker");

    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; nothing can have expired yet.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                cleanup_once(&sessions, &views).await;
            }
            () = shutdown.cancelled() => {
                tracing::info!("Session cleanup worker shutting down");
                break;
            }
        }
    }
}
