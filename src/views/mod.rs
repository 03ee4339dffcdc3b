//! Per-page state and row actions.
//!
//! Each listing page owns one view, shared by every request for that page.
//! A view supplies the fetch function and table parameters of its
//! collection plus the moderation actions available on its rows. Every
//! action re-fetches the collection once its backend calls succeed.

pub mod dashboard;
pub mod format;
pub mod posts;
pub mod reports;
pub mod users;

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::backend::{ApiError, BackendApi};
use crate::collection::{CollectionView, RefreshOutcome};
use crate::config::Config;

pub use dashboard::{DashboardMetrics, DashboardView};
pub use posts::{PostDetails, PostTab, PostsView};
pub use reports::{ReportDetails, ReportRow, ReportsView};
pub use users::UsersView;

/// Failure of a row action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A backend call in the action's sequence failed. Calls before it
    /// have already taken effect.
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("{0}")]
    NotAllowed(&'static str),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl ActionError {
    /// Adapter for `map_err` naming the step that failed.
    pub fn step(step: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Step { step, source }
    }
}

/// Re-fetch after a successful action. A failed re-fetch only logs; the
/// action itself already succeeded.
pub(crate) async fn refetch<T: Clone + Send + Sync + 'static>(collection: &CollectionView<T>) {
    match collection.refresh().await {
        Ok(RefreshOutcome::Applied | RefreshOutcome::Stale) => {}
        Err(e) => warn!(view = collection.remote().name(), error = %e, "Re-fetch after action failed"),
    }
}

/// All page views of the dashboard.
pub struct Views {
    pub dashboard: Arc<DashboardView>,
    pub users: Arc<UsersView>,
    pub posts: Arc<PostsView>,
    pub reports: Arc<ReportsView>,
}

impl Views {
    #[must_use]
    pub fn new(api: &BackendApi, config: &Config) -> Self {
        Self {
            dashboard: Arc::new(DashboardView::new(api.clone())),
            users: Arc::new(UsersView::new(api.clone(), config.table_page_size)),
            posts: Arc::new(PostsView::new(api.clone(), config.table_page_size)),
            reports: Arc::new(ReportsView::new(
                api.clone(),
                config.table_page_size,
                config.lookup_concurrency,
            )),
        }
    }

    /// Stop every refresh timer.
    pub async fn deactivate_all(&self) {
        self.dashboard.remote().deactivate().await;
        self.users.collection().deactivate().await;
        self.posts.collection().deactivate().await;
        self.reports.collection().deactivate().await;
    }
}
