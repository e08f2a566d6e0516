//! Graceful shutdown.
//!
//! A [`ShutdownSignal`] is a cloneable trigger that every accept loop and
//! connection task watches. [`ConnectionTracker`] counts live connections
//! so the server can wait for them to drain before returning.
//!
//! # Example
//!
//! ```rust
//! use crumb_server::ShutdownSignal;
//!
//! let shutdown = ShutdownSignal::new();
//! let remote = shutdown.clone();
//!
//! remote.trigger();
//! assert!(shutdown.is_shutdown());
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify};

/// A cloneable, one-way shutdown trigger.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    state: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Triggers shutdown. Later calls have no effect.
    pub fn trigger(&self) {
        let first = self.state.send_if_modified(|triggered| !std::mem::replace(triggered, true));
        if first {
            tracing::debug!("shutdown triggered");
        }
    }

    /// Returns `true` once shutdown has been triggered.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.state.borrow()
    }

    /// Returns a future that resolves once shutdown is triggered, or
    /// immediately if it already was.
    pub fn recv(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.state.subscribe();
        async move {
            // Errors only once every signal clone is gone.
            let _ = receiver.wait_for(|triggered| *triggered).await;
        }
    }

    /// Creates a signal that triggers on SIGINT or SIGTERM.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            wait_for_os_signal().await;
            tracing::info!("shutdown signal received");
            trigger.trigger();
        });

        signal
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn wait_for_os_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => Some(stream),
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM");
            None
        }
    };

    let sigterm = async {
        match terminate.as_mut() {
            Some(stream) => {
                stream.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        () = ctrl_c() => {}
        () = sigterm => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_os_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Counts live connections and lets shutdown wait for them to finish.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug, Default)]
struct TrackerInner {
    active: AtomicUsize,
    idle: Notify,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection. It stays counted until the token drops.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        ConnectionToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Returns the number of live connections.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Waits until no connection is live.
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.inner.idle.notified();
            if self.active_connections() == 0 {
                return;
            }
            idle.await;
        }
    }
}

/// Keeps one connection counted in a [`ConnectionTracker`].
#[derive(Debug)]
pub struct ConnectionToken {
    inner: Arc<TrackerInner>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_signal_starts_untriggered() {
        assert!(!ShutdownSignal::new().is_shutdown());
        assert!(!ShutdownSignal::default().is_shutdown());
    }

    #[test]
    fn test_trigger_is_idempotent_and_shared() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();

        clone.trigger();
        clone.trigger();
        assert!(signal.is_shutdown());
    }

    #[tokio::test]
    async fn test_recv_after_trigger_resolves() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("recv should resolve");
    }

    #[tokio::test]
    async fn test_recv_wakes_on_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = tokio::spawn(signal.recv());

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        signal.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[test]
    fn test_tracker_counts_tokens() {
        let tracker = ConnectionTracker::new();
        let a = tracker.acquire();
        let b = tracker.acquire();
        assert_eq!(tracker.active_connections(), 2);

        drop(a);
        assert_eq!(tracker.active_connections(), 1);
        drop(b);
        assert_eq!(tracker.active_connections(), 0);
    }

    #[test]
    fn test_wait_idle_without_connections() {
        tokio_test::block_on(ConnectionTracker::new().wait_idle());
    }

    #[tokio::test]
    async fn test_wait_idle_after_last_token_drops() {
        let tracker = ConnectionTracker::new();
        let token = tracker.acquire();

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_idle().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(token);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("tracker should become idle")
            .unwrap();
    }
}
