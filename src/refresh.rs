//! Periodic refresh timer for listing pages.
//!
//! An [`AutoRefresh`] runs its callback once when started, then on every
//! interval tick until it is stopped or dropped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Callback invoked on every refresh.
pub type RefreshFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Wrap an async closure as a [`RefreshFn`].
pub fn refresh_fn<F, Fut>(f: F) -> RefreshFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

pub struct AutoRefresh {
    callback: RefreshFn,
    interval: Duration,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Run `callback` once, then start the interval timer.
    ///
    /// The first invocation is awaited so the caller has data before it
    /// renders anything.
    pub async fn start(callback: RefreshFn, interval: Duration) -> Self {
        callback().await;
        Self::spawn(callback, interval)
    }

    fn spawn(callback: RefreshFn, interval: Duration) -> Self {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let tick_callback = Arc::clone(&callback);

        let task = tokio::spawn(async move {
            // First tick one full interval after the immediate run
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        tracing::debug!("Refresh timer stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        tick_callback().await;
                    }
                }
            }
        });

        Self {
            callback,
            interval,
            shutdown,
            task: Some(task),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Run the callback now, outside the timer schedule.
    pub async fn refresh_now(&self) {
        (self.callback)().await;
    }

    /// Replace the callback: stop the current timer and start a new one,
    /// running the new callback immediately.
    pub async fn restart(&mut self, callback: RefreshFn) {
        self.halt().await;
        *self = Self::start(callback, self.interval).await;
    }

    /// Stop the timer and wait for its task to exit.
    ///
    /// An invocation already in progress runs to completion; none start
    /// afterwards.
    pub async fn stop(mut self) {
        self.halt().await;
    }

    async fn halt(&mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Refresh timer task ended abnormally");
            }
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (Arc<AtomicUsize>, RefreshFn) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let callback = refresh_fn(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (count, callback)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_on_interval() {
        let (count, callback) = counting();
        let refresh = AutoRefresh::start(callback, Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(count.load(Ordering::SeqCst) >= 4);

        refresh.stop().await;
        let stopped_at = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), stopped_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (count, callback) = counting();
        let refresh = AutoRefresh::start(callback, Duration::from_millis(500)).await;
        drop(refresh);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_switches_callback() {
        let (first, first_cb) = counting();
        let (second, second_cb) = counting();

        let mut refresh = AutoRefresh::start(first_cb, Duration::from_millis(1000)).await;
        refresh.restart(second_cb).await;
        assert_eq!(second.load(Ordering::SeqCst), 1);
        let first_total = first.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(first.load(Ordering::SeqCst), first_total);
        assert!(second.load(Ordering::SeqCst) >= 3);
        assert!(refresh.is_running());

        refresh.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_invokes_callback() {
        let (count, callback) = counting();
        let refresh = AutoRefresh::start(callback, Duration::from_secs(30)).await;
        refresh.refresh_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        refresh.stop().await;
    }
}
