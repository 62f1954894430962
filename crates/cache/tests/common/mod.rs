#![allow(dead_code)]
//! Shared fixtures for identity cache integration tests

use async_trait::async_trait;
use edgescope_cache::{
    IdentityCacheConfig, IdentityCacheConfigBuilder, ServiceIdentitiesIterator, ServiceProxy,
};
use edgescope_core::{
    Error, Result, ServiceAuthentication, ServiceIdentity, ServiceIdentityStatus,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const ROOT: &str = "edge1";
pub const ROOT_SCOPE: &str = "scope-edge1";
pub const WAIT: Duration = Duration::from_secs(5);

/// In-memory directory with switches for failures and stalls
pub struct MockServiceProxy {
    directory: Mutex<BTreeMap<String, ServiceIdentity>>,
    page_size: usize,
    iterator_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    lookups: Mutex<Vec<String>>,
    fail_after_pages: Mutex<Option<usize>>,
    fail_lookups: AtomicBool,
    gate: Arc<Semaphore>,
}

impl MockServiceProxy {
    pub fn new(identities: Vec<ServiceIdentity>) -> Arc<Self> {
        Arc::new(Self::with_gate(identities, 1))
    }

    /// Every page fetch blocks until [`open_gate`](Self::open_gate) is called
    pub fn gated(identities: Vec<ServiceIdentity>) -> Arc<Self> {
        Arc::new(Self::with_gate(identities, 0))
    }

    fn with_gate(identities: Vec<ServiceIdentity>, permits: usize) -> Self {
        Self {
            directory: Mutex::new(
                identities
                    .into_iter()
                    .map(|identity| (identity.id().to_string(), identity))
                    .collect(),
            ),
            page_size: 2,
            iterator_calls: AtomicUsize::new(0),
            lookup_calls: AtomicUsize::new(0),
            lookups: Mutex::new(Vec::new()),
            fail_after_pages: Mutex::new(None),
            fail_lookups: AtomicBool::new(false),
            gate: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn open_gate(&self) {
        self.gate.add_permits(1);
    }

    pub fn upsert(&self, identity: ServiceIdentity) {
        self.directory
            .lock()
            .insert(identity.id().to_string(), identity);
    }

    pub fn remove(&self, id: &str) {
        self.directory.lock().remove(id);
    }

    /// Make full iterations fail once `pages` pages have been served
    pub fn fail_after_pages(&self, pages: Option<usize>) {
        *self.fail_after_pages.lock() = pages;
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn iterator_calls(&self) -> usize {
        self.iterator_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

struct MockIterator {
    pages: Vec<Vec<ServiceIdentity>>,
    served: usize,
    fail_after: Option<usize>,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl ServiceIdentitiesIterator for MockIterator {
    fn has_next(&self) -> bool {
        self.served < self.pages.len()
    }

    async fn get_next(&mut self) -> Result<Vec<ServiceIdentity>> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| Error::service_with_source("get_next", "gate closed", e))?;
        if self.fail_after.is_some_and(|limit| self.served >= limit) {
            return Err(Error::service("get_next", "directory unavailable"));
        }
        let page = self.pages.get(self.served).cloned().unwrap_or_default();
        self.served += 1;
        Ok(page)
    }
}

#[async_trait]
impl ServiceProxy for MockServiceProxy {
    fn identities_iterator(&self) -> Box<dyn ServiceIdentitiesIterator> {
        self.iterator_calls.fetch_add(1, Ordering::SeqCst);
        let identities: Vec<ServiceIdentity> = self.directory.lock().values().cloned().collect();
        Box::new(MockIterator {
            pages: identities
                .chunks(self.page_size)
                .map(<[ServiceIdentity]>::to_vec)
                .collect(),
            served: 0,
            fail_after: *self.fail_after_pages.lock(),
            gate: Arc::clone(&self.gate),
        })
    }

    async fn get_service_identity(
        &self,
        device_id: &str,
        module_id: Option<&str>,
    ) -> Result<Option<ServiceIdentity>> {
        let id = match module_id {
            Some(module_id) => format!("{device_id}/{module_id}"),
            None => device_id.to_string(),
        };
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.lookups.lock().push(id.clone());
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Error::service("get_service_identity", "connection reset"));
        }
        Ok(self.directory.lock().get(&id).cloned())
    }
}

pub fn root_edge() -> ServiceIdentity {
    ServiceIdentity::device(ROOT, ServiceAuthentication::None, ServiceIdentityStatus::Enabled)
        .unwrap()
        .as_edge(ROOT_SCOPE)
}

/// Leaf device under the root edge
pub fn leaf(id: &str) -> ServiceIdentity {
    leaf_with_auth(id, ServiceAuthentication::symmetric_key("primary", "secondary"))
}

pub fn leaf_with_auth(id: &str, authentication: ServiceAuthentication) -> ServiceIdentity {
    ServiceIdentity::device(id, authentication, ServiceIdentityStatus::Enabled)
        .unwrap()
        .with_parent_scope(ROOT_SCOPE)
}

/// Root plus leaves `d1..=dn`
pub fn directory(leaves: usize) -> Vec<ServiceIdentity> {
    let mut identities = vec![root_edge()];
    identities.extend((1..=leaves).map(|i| leaf(&format!("d{i}"))));
    identities
}

/// Long refresh rate so only explicit requests trigger cycles; no debounce
pub fn config() -> IdentityCacheConfig {
    IdentityCacheConfigBuilder::new(ROOT)
        .with_refresh_rate(Duration::from_secs(3600))
        .with_refresh_delay(Duration::ZERO)
        .build()
        .unwrap()
}

/// Route cache logs through the test harness; repeated calls are harmless
pub fn init_tracing() {
    let _ = edgescope_utils::tracing::init();
}

pub fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}
