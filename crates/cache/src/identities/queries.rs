//! Read-side operations

use edgescope_core::{
    split_identity_id, validate_id, AuthChain, AuthChainError, DeviceState, Error, IdentityEvent,
    Result, ServiceIdentity,
};
use tokio::sync::mpsc;

use super::types::DeviceScopeIdentitiesCache;
use crate::config::IdentityCacheConfig;

impl DeviceScopeIdentitiesCache {
    /// Cached identity; never contacts the directory
    pub fn get_service_identity(&self, id: &str) -> Result<Option<ServiceIdentity>> {
        validate_id(id, "id")?;
        Ok(self.inner.hierarchy.read().get(id).cloned())
    }

    /// Look the identity up directly in the directory without touching the cache
    pub async fn get_service_identity_from_service(
        &self,
        id: &str,
    ) -> Result<Option<ServiceIdentity>> {
        let (device_id, module_id) = split_identity_id(id)?;
        self.inner
            .service_proxy
            .get_service_identity(device_id, module_id)
            .await
    }

    /// Authentication chain from `id` up to the local edge device, or `None`
    /// when the identity is unknown or not authorized through this edge
    pub fn get_auth_chain(&self, id: &str) -> Result<Option<AuthChain>> {
        validate_id(id, "id")?;
        Ok(self.inner.hierarchy.read().get_auth_chain(id))
    }

    /// Like [`get_auth_chain`](Self::get_auth_chain) but reports why no chain exists
    pub fn try_get_auth_chain(&self, id: &str) -> Result<AuthChain> {
        validate_id(id, "id")?;
        self.inner
            .hierarchy
            .read()
            .try_get_auth_chain(id)
            .map_err(Error::from)
    }

    /// Every cached id, sorted
    pub fn get_all_ids(&self) -> Vec<String> {
        self.inner.hierarchy.read().get_all_ids()
    }

    /// Ids whose parent resolves directly to `id`
    pub fn get_immediate_children(&self, id: &str) -> Result<Vec<String>> {
        validate_id(id, "id")?;
        Ok(self.inner.hierarchy.read().get_immediate_children(id))
    }

    /// Check that `id` is known, enabled and reachable through this edge.
    ///
    /// With `refresh_cached` the identity is refreshed from the directory
    /// first (subject to the usual debounce).
    pub async fn verify_service_identity_auth_chain_state(
        &self,
        id: &str,
        refresh_cached: bool,
    ) -> Result<AuthChain> {
        validate_id(id, "id")?;
        if refresh_cached {
            self.refresh_service_identity(id).await?;
        }

        let result = self.inner.hierarchy.read().try_get_auth_chain(id);
        result.map_err(|e| {
            let state = match e {
                AuthChainError::NotFound { .. } => DeviceState::NotFound,
                AuthChainError::Disabled { id: ref disabled } if disabled == id => {
                    DeviceState::Disabled
                }
                _ => DeviceState::NotInScope,
            };
            Error::device_invalid_state(id, state)
        })
    }

    /// Receive every identity change published after this call
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityEvent> {
        self.inner.events.subscribe()
    }

    pub fn config(&self) -> &IdentityCacheConfig {
        &self.inner.config
    }

    /// Stop the background refresh task. Queries keep working on the
    /// current contents.
    pub fn shutdown(&self) {
        if let Some(handle) = self.inner.refresh_handle.lock().take() {
            handle.abort();
            tracing::info!("Identity cache refresh task stopped");
        }
    }
}
