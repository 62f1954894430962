//! Background full-refresh task management

use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn, Instrument};

use super::types::{CacheInner, DeviceScopeIdentitiesCache};

/// Start the refresh loop. The first cycle runs immediately, then once per
/// `refresh_rate` or whenever a refresh is requested.
///
/// The task only holds a weak reference between cycles and exits once the
/// cache is gone.
pub(super) fn start_refresh_task(cache: &DeviceScopeIdentitiesCache) {
    let weak = Arc::downgrade(&cache.inner);
    let signal = Arc::clone(&cache.inner.refresh_signal);
    let refresh_rate = cache.inner.config.refresh_rate;

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_rate);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = signal.notified() => {
                    let Some(inner) = weak.upgrade() else { break };
                    if !inner.refresh_status.borrow().pending {
                        continue;
                    }
                }
            }

            let Some(inner) = weak.upgrade() else { break };
            cycle += 1;
            run_cycle(inner, cycle).await;
            interval.reset();
        }
    });

    *cache.inner.refresh_handle.lock() = Some(handle);
}

async fn run_cycle(inner: Arc<CacheInner>, cycle: u64) {
    inner.refresh_status.send_modify(|status| {
        status.pending = false;
        status.started += 1;
    });

    let cache = DeviceScopeIdentitiesCache { inner };
    let outcome = cache
        .refresh_cache()
        .instrument(edgescope_utils::tracing::refresh_span(cycle))
        .await;

    cache.prune_refresh_timestamps();

    match &outcome {
        Ok(count) => info!(cycle, identities = count, "Identity cache refreshed"),
        Err(e) => warn!(cycle, error = %e, "Identity cache refresh failed; keeping previous state"),
    }

    cache.inner.refresh_status.send_modify(|status| {
        status.completed += 1;
        if outcome.is_ok() {
            status.succeeded += 1;
        }
    });
}
