//! Core orchestrator types

use crate::config::IdentityCacheConfig;
use crate::hierarchy::ServiceIdentityHierarchy;
use crate::service::ServiceProxy;
use crate::store::IdentityStore;
use dashmap::DashMap;
use edgescope_core::EventBus;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use super::status::RefreshStatus;

/// Edge-local cache of every service identity in the device's scope
///
/// Cloning is cheap and every clone shares the same state. The background
/// refresh task stops once the last clone is dropped.
#[derive(Clone)]
pub struct DeviceScopeIdentitiesCache {
    pub(super) inner: Arc<CacheInner>,
}

pub(super) struct CacheInner {
    /// Configuration
    pub config: IdentityCacheConfig,
    /// Identity forest; the only lock around identity state
    pub hierarchy: RwLock<ServiceIdentityHierarchy>,
    /// Remote directory
    pub service_proxy: Arc<dyn ServiceProxy>,
    /// Persistent snapshot
    pub store: Arc<dyn IdentityStore>,
    /// Change notifications
    pub events: EventBus,
    /// Last successful targeted refresh per id
    pub last_refreshed: DashMap<String, Instant>,
    /// Wakes the refresh loop; holds at most one permit
    pub refresh_signal: Arc<Notify>,
    /// Progress of the refresh loop
    pub refresh_status: watch::Sender<RefreshStatus>,
    /// Background refresh task handle
    pub refresh_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for CacheInner {
    fn drop(&mut self) {
        if let Some(handle) = self.refresh_handle.lock().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for DeviceScopeIdentitiesCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceScopeIdentitiesCache")
            .field("edge_device_id", &self.inner.config.edge_device_id)
            .field("identity_count", &self.inner.hierarchy.read().len())
            .field("refresh_status", &*self.inner.refresh_status.borrow())
            .field("subscribers", &self.inner.events.subscriber_count())
            .finish()
    }
}
