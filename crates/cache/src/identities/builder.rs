//! Cache construction and startup

use dashmap::DashMap;
use edgescope_core::{EventBus, Result};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tracing::{info, warn};

use super::background::start_refresh_task;
use super::status::RefreshStatus;
use super::types::{CacheInner, DeviceScopeIdentitiesCache};
use crate::config::IdentityCacheConfig;
use crate::hierarchy::ServiceIdentityHierarchy;
use crate::service::ServiceProxy;
use crate::store::{FileIdentityStore, IdentityStore, InMemoryIdentityStore};

/// Builder for [`DeviceScopeIdentitiesCache`]
pub struct DeviceScopeIdentitiesCacheBuilder {
    config: IdentityCacheConfig,
    service_proxy: Arc<dyn ServiceProxy>,
    store: Option<Arc<dyn IdentityStore>>,
    events: Option<EventBus>,
}

impl DeviceScopeIdentitiesCacheBuilder {
    pub fn new(config: IdentityCacheConfig, service_proxy: Arc<dyn ServiceProxy>) -> Self {
        Self {
            config,
            service_proxy,
            store: None,
            events: None,
        }
    }

    /// Use `store` instead of the one derived from `store_dir`
    pub fn with_store(mut self, store: Arc<dyn IdentityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Publish on an existing bus, e.g. to subscribe before the first cycle
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Validate the configuration, load persisted identities and start the
    /// background refresh task. Must be called within a tokio runtime.
    pub async fn build(self) -> Result<DeviceScopeIdentitiesCache> {
        self.config.validate()?;

        let store: Arc<dyn IdentityStore> = match (self.store, &self.config.store_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(FileIdentityStore::open(dir.clone()).await?),
            (None, None) => Arc::new(InMemoryIdentityStore::new()),
        };
        let events = self.events.unwrap_or_default();
        let hierarchy = ServiceIdentityHierarchy::with_max_edge_depth(
            self.config.edge_device_id.clone(),
            self.config.max_edge_depth,
        );
        let (refresh_status, _) = watch::channel(RefreshStatus::default());

        let inner = Arc::new(CacheInner {
            config: self.config,
            hierarchy: RwLock::new(hierarchy),
            service_proxy: self.service_proxy,
            store,
            events,
            last_refreshed: DashMap::new(),
            refresh_signal: Arc::new(Notify::new()),
            refresh_status,
            refresh_handle: Mutex::new(None),
        });

        let cache = DeviceScopeIdentitiesCache { inner };

        match cache.hydrate().await {
            Ok(count) => info!(
                edge_device_id = %cache.inner.config.edge_device_id,
                identities = count,
                "Loaded persisted service identities"
            ),
            Err(e) => warn!(error = %e, "Failed to load persisted service identities; starting empty"),
        }

        start_refresh_task(&cache);

        Ok(cache)
    }
}

impl DeviceScopeIdentitiesCache {
    /// Shorthand for [`DeviceScopeIdentitiesCacheBuilder`] with defaults
    pub async fn new(
        config: IdentityCacheConfig,
        service_proxy: Arc<dyn ServiceProxy>,
    ) -> Result<Self> {
        DeviceScopeIdentitiesCacheBuilder::new(config, service_proxy)
            .build()
            .await
    }

    pub fn builder(
        config: IdentityCacheConfig,
        service_proxy: Arc<dyn ServiceProxy>,
    ) -> DeviceScopeIdentitiesCacheBuilder {
        DeviceScopeIdentitiesCacheBuilder::new(config, service_proxy)
    }
}
