//! Full directory refresh

use edgescope_core::{IdentityEvent, Result, ServiceIdentity};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::types::DeviceScopeIdentitiesCache;
use crate::store::StoredServiceIdentity;

impl DeviceScopeIdentitiesCache {
    /// Pull every page from the directory and make the cache match it.
    ///
    /// Only ids cached when the cycle started can be dropped by it, so an
    /// identity a targeted refresh stores mid-cycle survives. Nothing is
    /// applied unless every page was fetched. Returns the number of
    /// identities seen.
    pub(super) async fn refresh_cache(&self) -> Result<usize> {
        let previous: BTreeSet<String> =
            self.inner.hierarchy.read().get_all_ids().into_iter().collect();
        let identities = self.fetch_all_identities().await?;
        let seen: BTreeSet<String> = identities.iter().map(|i| i.id().to_string()).collect();

        let removed = {
            let mut hierarchy = self.inner.hierarchy.write();
            for identity in &identities {
                hierarchy.insert_or_update(identity.clone());
            }
            previous
                .difference(&seen)
                .filter(|id| hierarchy.remove(id).is_some())
                .cloned()
                .collect::<Vec<String>>()
        };

        for id in &removed {
            self.inner.last_refreshed.remove(id);
            self.inner
                .events
                .publish(IdentityEvent::ServiceIdentityRemoved(id.clone()));
        }
        self.inner
            .events
            .publish(IdentityEvent::ServiceIdentitiesUpdated(
                seen.iter().cloned().collect(),
            ));

        debug!(
            seen = seen.len(),
            removed = removed.len(),
            "Applied directory snapshot"
        );

        for identity in &identities {
            self.persist(identity).await;
        }
        for id in &removed {
            self.unpersist(id).await;
        }

        Ok(seen.len())
    }

    async fn fetch_all_identities(&self) -> Result<Vec<ServiceIdentity>> {
        let mut iterator = self.inner.service_proxy.identities_iterator();
        let mut identities = Vec::new();
        let mut pages = 0usize;
        while iterator.has_next() {
            let page = iterator.get_next().await?;
            pages += 1;
            identities.extend(page);
        }
        debug!(pages, identities = identities.len(), "Fetched directory pages");
        Ok(identities)
    }

    /// Write an identity to the store; failures are logged only
    pub(super) async fn persist(&self, identity: &ServiceIdentity) {
        let result = match StoredServiceIdentity::new(identity.clone()).encode() {
            Ok(bytes) => self.inner.store.put(identity.id(), bytes).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(id = %identity.id(), error = %e, "Failed to persist service identity");
        }
    }

    /// Delete an identity from the store; failures are logged only
    pub(super) async fn unpersist(&self, id: &str) {
        if let Err(e) = self.inner.store.remove(id).await {
            warn!(id = %id, error = %e, "Failed to remove persisted service identity");
        }
    }

    /// Load every persisted identity into the hierarchy
    pub(super) async fn hydrate(&self) -> Result<usize> {
        let entries = self.inner.store.get_all().await?;
        let mut loaded = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            match StoredServiceIdentity::decode(&bytes) {
                Ok(stored) if stored.id == key => loaded.push(stored.into_identity()),
                Ok(stored) => {
                    warn!(key = %key, id = %stored.id, "Persisted identity stored under wrong key; skipping");
                }
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable persisted identity"),
            }
        }

        let count = loaded.len();
        let mut hierarchy = self.inner.hierarchy.write();
        for identity in loaded {
            hierarchy.insert_or_update(identity);
        }
        Ok(count)
    }
}
