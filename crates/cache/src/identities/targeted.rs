//! Targeted refresh of individual identities and chains

use edgescope_core::{
    split_identity_id, validate_id, AuthChain, IdentityEvent, Result, ServiceIdentity,
};
use std::time::Instant;
use tracing::debug;

use super::types::DeviceScopeIdentitiesCache;

impl DeviceScopeIdentitiesCache {
    /// Re-fetch one identity from the directory.
    ///
    /// Stores and announces it when found, removes and announces its
    /// removal when the directory no longer knows it. Directory errors are
    /// returned unchanged.
    pub async fn refresh_service_identity(&self, id: &str) -> Result<()> {
        validate_id(id, "id")?;
        self.refresh_one(id).await
    }

    /// Refresh each id in order, stopping at the first failure
    pub async fn refresh_service_identities<S: AsRef<str>>(&self, ids: &[S]) -> Result<()> {
        for id in ids {
            split_identity_id(id.as_ref())?;
        }
        for id in ids {
            self.refresh_one(id.as_ref()).await?;
        }
        Ok(())
    }

    /// Refresh every id on a `leaf;...;root` chain, leaf first
    pub async fn refresh_auth_chain(&self, auth_chain: &str) -> Result<()> {
        let chain = AuthChain::parse(auth_chain)?;
        for id in chain.ids() {
            split_identity_id(id)?;
        }
        for id in chain.ids() {
            self.refresh_one(id).await?;
        }
        Ok(())
    }

    async fn refresh_one(&self, id: &str) -> Result<()> {
        let (device_id, module_id) = split_identity_id(id)?;
        let cached = self.inner.hierarchy.read().get(id).cloned();

        if self.recently_refreshed(id, cached.as_ref()) {
            debug!(id = %id, "Skipping refresh; identity refreshed recently");
            return Ok(());
        }

        let fetched = self
            .inner
            .service_proxy
            .get_service_identity(device_id, module_id)
            .await?;

        match fetched {
            Some(identity) => self.apply_update(identity).await,
            None => self.apply_removal(id).await,
        }
        if !self.inner.config.refresh_delay.is_zero() {
            self.inner
                .last_refreshed
                .insert(id.to_string(), Instant::now());
        }
        Ok(())
    }

    /// Forget refresh timestamps older than `refresh_delay`, including those
    /// of ids that were never found.
    pub(super) fn prune_refresh_timestamps(&self) {
        let delay = self.inner.config.refresh_delay;
        let before = self.inner.last_refreshed.len();
        self.inner
            .last_refreshed
            .retain(|_, refreshed_at| refreshed_at.elapsed() < delay);
        let pruned = before.saturating_sub(self.inner.last_refreshed.len());
        if pruned > 0 {
            debug!(pruned, "Pruned expired refresh timestamps");
        }
    }

    /// Number of ids whose targeted refreshes are currently being debounced
    pub fn debounced_id_count(&self) -> usize {
        self.inner.last_refreshed.len()
    }

    /// An identity cached without credentials is always re-fetched so that
    /// newly provisioned keys show up immediately.
    fn recently_refreshed(&self, id: &str, cached: Option<&ServiceIdentity>) -> bool {
        let delay = self.inner.config.refresh_delay;
        if delay.is_zero() {
            return false;
        }
        let Some(last) = self.inner.last_refreshed.get(id).map(|entry| *entry.value()) else {
            return false;
        };
        if last.elapsed() >= delay {
            return false;
        }
        match cached {
            Some(identity) => !identity.authentication().is_none(),
            None => true,
        }
    }

    async fn apply_update(&self, identity: ServiceIdentity) {
        let changed = {
            let mut hierarchy = self.inner.hierarchy.write();
            let previous = hierarchy.insert_or_update(identity.clone());
            previous.as_ref() != Some(&identity)
        };
        if !changed {
            debug!(id = %identity.id(), "Service identity unchanged");
            return;
        }

        debug!(id = %identity.id(), "Service identity updated");
        self.inner
            .events
            .publish(IdentityEvent::ServiceIdentityUpdated(identity.clone()));
        self.persist(&identity).await;
    }

    async fn apply_removal(&self, id: &str) {
        let removed = self.inner.hierarchy.write().remove(id);
        if removed.is_none() {
            return;
        }

        debug!(id = %id, "Service identity removed");
        self.inner
            .events
            .publish(IdentityEvent::ServiceIdentityRemoved(id.to_string()));
        self.unpersist(id).await;
    }
}
