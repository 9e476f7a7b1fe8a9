//! Request admission and drain tracking for graceful shutdown.
//!
//! The lifecycle state sits behind `ArcSwap` so every request can read it
//! without locking. Each admitted request holds a [`RequestPermit`]; dropping
//! the last one wakes whoever is waiting for the drain.

use std::pin::pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::Notify;

/// Server lifecycle state.
///
/// Starting -> Ready -> Draining -> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Store seeded, listener not serving yet.
    Starting,
    /// Serving requests.
    Ready,
    /// Shutdown requested; new movie requests are refused.
    Draining,
    /// Every admitted request has finished.
    Stopped,
}

impl HealthState {
    /// Lowercase name used in the `/health` response.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }

    /// `false` once shutdown has begun.
    #[must_use]
    pub fn admits_requests(self) -> bool {
        matches!(self, Self::Starting | Self::Ready)
    }
}

#[derive(Debug, Default)]
struct ActiveRequests {
    count: AtomicU64,
    idle: Notify,
}

/// Owns the lifecycle state and counts admitted requests.
#[derive(Debug)]
pub struct ShutdownController {
    active: Arc<ActiveRequests>,
    state: ArcSwap<HealthState>,
}

impl ShutdownController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Arc::new(ActiveRequests::default()),
            state: ArcSwap::from_pointee(HealthState::Starting),
        }
    }

    pub fn set_ready(&self) {
        self.state.store(Arc::new(HealthState::Ready));
    }

    /// Stops admitting requests. Permits already handed out stay valid.
    pub fn trigger_shutdown(&self) {
        self.state.store(Arc::new(HealthState::Draining));
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.state.load()
    }

    /// Counts a request that runs regardless of the lifecycle state.
    #[must_use]
    pub fn track(&self) -> RequestPermit {
        self.active.count.fetch_add(1, Ordering::SeqCst);
        RequestPermit {
            active: Arc::clone(&self.active),
        }
    }

    /// Admits a request, or returns `None` once shutdown has begun.
    ///
    /// The count is raised before the state is read, so a drain that starts
    /// concurrently either sees this request or this request sees the drain.
    #[must_use]
    pub fn admit(&self) -> Option<RequestPermit> {
        let permit = self.track();
        self.health_state().admits_requests().then_some(permit)
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.active.count.load(Ordering::SeqCst)
    }

    /// Waits, up to `timeout`, for every permit to be dropped.
    ///
    /// Returns `true` and moves to `Stopped` once drained. On timeout the
    /// state is left as it was and `false` is returned.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let drained = async {
            loop {
                let mut idle = pin!(self.active.idle.notified());
                idle.as_mut().enable();
                if self.in_flight_count() == 0 {
                    return;
                }
                idle.await;
            }
        };

        if tokio::time::timeout(timeout, drained).await.is_ok() {
            self.state.store(Arc::new(HealthState::Stopped));
            true
        } else {
            false
        }
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// One admitted request. Released on drop, including during unwinding.
#[derive(Debug)]
pub struct RequestPermit {
    active: Arc<ActiveRequests>,
}

impl Drop for RequestPermit {
    fn drop(&mut self) {
        if self.active.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.active.idle.notify_waiters();
        }
    }
}
