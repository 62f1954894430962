//! Refresh signalling and synchronization

use std::time::Duration;
use tracing::debug;

use super::types::DeviceScopeIdentitiesCache;

/// Counters published by the refresh loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStatus {
    /// A full refresh was requested and has not started yet
    pub pending: bool,
    /// Cycles started
    pub started: u64,
    /// Cycles finished, successful or not
    pub completed: u64,
    /// Cycles that applied a full directory snapshot
    pub succeeded: u64,
}

impl RefreshStatus {
    pub fn is_running(&self) -> bool {
        self.started > self.completed
    }
}

impl DeviceScopeIdentitiesCache {
    /// Request a full refresh. Requests made before the next cycle starts
    /// collapse into that one cycle.
    pub fn initiate_cache_refresh(&self) {
        let newly_pending = self.inner.refresh_status.send_if_modified(|status| {
            let was_pending = status.pending;
            status.pending = true;
            !was_pending
        });
        if newly_pending {
            debug!("Full identity refresh requested");
        }
        self.inner.refresh_signal.notify_one();
    }

    /// Wait until the requested or in-flight cycle completes.
    ///
    /// Returns immediately when nothing is pending or running, and `false`
    /// if `timeout` elapses first.
    pub async fn wait_for_cache_refresh(&self, timeout: Duration) -> bool {
        let mut receiver = self.inner.refresh_status.subscribe();
        let target = {
            let status = receiver.borrow_and_update();
            if status.pending {
                status.started + 1
            } else if status.is_running() {
                status.started
            } else {
                return true;
            }
        };

        tokio::time::timeout(timeout, receiver.wait_for(|s| s.completed >= target))
            .await
            .map(|result| result.is_ok())
            .unwrap_or(false)
    }

    /// Wait until the first refresh cycle after construction has finished
    pub async fn wait_for_initial_caching_complete(&self, timeout: Duration) -> bool {
        let mut receiver = self.inner.refresh_status.subscribe();
        tokio::time::timeout(timeout, receiver.wait_for(|s| s.completed >= 1))
            .await
            .map(|result| result.is_ok())
            .unwrap_or(false)
    }

    /// Snapshot of the refresh loop counters
    pub fn refresh_status(&self) -> RefreshStatus {
        *self.inner.refresh_status.borrow()
    }
}
