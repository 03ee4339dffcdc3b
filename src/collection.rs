//! Remotely fetched state shared by all requests for one page.
//!
//! [`Remote`] owns the last successfully loaded value, the last error and
//! the refresh timer. Each load is stamped with a generation number; a load
//! that finishes after a newer one has been applied is discarded.
//! [`CollectionView`] pairs a `Remote<Vec<T>>` with the table pipeline.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::ApiError;
use crate::refresh::{refresh_fn, AutoRefresh};
use crate::table::{TablePage, TableQuery, TableSpec};

/// Loads a fresh value from the backend.
pub type Loader<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V, ApiError>> + Send + Sync>;

/// Wrap an async closure as a [`Loader`].
pub fn loader<V, F, Fut>(f: F) -> Loader<V>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, ApiError>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// What happened to the result of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer load was applied first; this result was dropped.
    Stale,
}

/// Copy of the current state, taken without holding any lock.
#[derive(Debug, Clone)]
pub struct Snapshot<V> {
    pub value: Option<V>,
    pub last_error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<V> Snapshot<V> {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

struct State<V> {
    value: Option<V>,
    last_error: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
    applied_generation: u64,
}

pub struct Remote<V> {
    name: &'static str,
    load: Loader<V>,
    next_generation: AtomicU64,
    state: RwLock<State<V>>,
    refresher: Mutex<Option<AutoRefresh>>,
}

impl<V: Clone + Send + Sync + 'static> Remote<V> {
    #[must_use]
    pub fn new(name: &'static str, load: Loader<V>) -> Arc<Self> {
        Arc::new(Self {
            name,
            load,
            next_generation: AtomicU64::new(0),
            state: RwLock::new(State {
                value: None,
                last_error: None,
                fetched_at: None,
                applied_generation: 0,
            }),
            refresher: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Load a fresh value and apply it unless a newer load already landed.
    ///
    /// A failed load keeps the previous value and records the error.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when this load was not superseded.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ApiError> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = (self.load)().await;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if generation < state.applied_generation {
            debug!(view = self.name, generation, "Discarding stale response");
            return Ok(RefreshOutcome::Stale);
        }

        match result {
            Ok(value) => {
                state.value = Some(value);
                state.last_error = None;
                state.fetched_at = Some(Utc::now());
                state.applied_generation = generation;
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<V> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            value: state.value.clone(),
            last_error: state.last_error.clone(),
            fetched_at: state.fetched_at,
        }
    }

    /// Start the refresh timer if it is not running.
    ///
    /// The first activation loads the value before returning.
    pub async fn activate(self: &Arc<Self>, interval: Duration) {
        let mut slot = self.refresher.lock().await;
        if slot.is_some() {
            return;
        }

        debug!(view = self.name, interval_secs = interval.as_secs(), "Activating view");
        let weak: Weak<Self> = Arc::downgrade(self);
        let callback = refresh_fn(move || {
            let weak = weak.clone();
            async move {
                if let Some(remote) = weak.upgrade() {
                    if let Err(e) = remote.refresh().await {
                        warn!(view = remote.name, error = %e, "Refresh failed");
                    }
                }
            }
        });
        *slot = Some(AutoRefresh::start(callback, interval).await);
    }

    /// Stop the refresh timer. The last value stays available.
    pub async fn deactivate(&self) {
        let refresher = self.refresher.lock().await.take();
        if let Some(refresher) = refresher {
            debug!(view = self.name, "Deactivating view");
            refresher.stop().await;
        }
    }

    pub async fn is_active(&self) -> bool {
        self.refresher.lock().await.is_some()
    }
}

/// Listing page state: a remote row collection plus the table pipeline.
pub struct CollectionView<T> {
    remote: Arc<Remote<Vec<T>>>,
    spec: TableSpec<T>,
}

/// A rendered-ready page of rows with the load status around it.
#[derive(Debug, Clone)]
pub struct TableView<T> {
    pub page: TablePage<T>,
    pub loaded: bool,
    pub last_error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T: Clone + Send + Sync + 'static> CollectionView<T> {
    #[must_use]
    pub fn new(name: &'static str, fetch: Loader<Vec<T>>, spec: TableSpec<T>) -> Self {
        Self {
            remote: Remote::new(name, fetch),
            spec,
        }
    }

    #[must_use]
    pub fn remote(&self) -> &Arc<Remote<Vec<T>>> {
        &self.remote
    }

    /// # Errors
    ///
    /// Returns the fetch error when this fetch was not superseded.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ApiError> {
        self.remote.refresh().await
    }

    pub async fn activate(&self, interval: Duration) {
        self.remote.activate(interval).await;
    }

    pub async fn deactivate(&self) {
        self.remote.deactivate().await;
    }

    /// Current rows, empty before the first successful fetch.
    #[must_use]
    pub fn rows(&self) -> Vec<T> {
        self.remote.snapshot().value.unwrap_or_default()
    }

    /// Run the current rows through the table pipeline.
    #[must_use]
    pub fn view(&self, query: &TableQuery) -> TableView<T> {
        self.view_with(query, |rows| rows)
    }

    /// Like [`view`](Self::view), with a page-specific step applied to the
    /// rows before filtering.
    #[must_use]
    pub fn view_with(
        &self,
        query: &TableQuery,
        prepare: impl FnOnce(Vec<T>) -> Vec<T>,
    ) -> TableView<T> {
        let snapshot = self.remote.snapshot();
        let loaded = snapshot.is_loaded();
        let rows = prepare(snapshot.value.unwrap_or_default());
        TableView {
            page: self.spec.apply(rows, query),
            loaded,
            last_error: snapshot.last_error,
            fetched_at: snapshot.fetched_at,
        }
    }
}
