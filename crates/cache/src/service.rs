//! Remote directory collaborator
//!
//! The authoritative device/module directory is reached through a
//! [`ServiceProxy`]. Implementations own transport, authentication and any
//! retry policy; the cache only sees identities or errors.

use async_trait::async_trait;
use edgescope_core::{Result, ServiceIdentity};
use std::collections::VecDeque;

/// Paged iteration over every identity in the edge's scope
#[async_trait]
pub trait ServiceIdentitiesIterator: Send {
    /// Whether another page may be requested
    fn has_next(&self) -> bool;

    /// Fetch the next page of identities
    async fn get_next(&mut self) -> Result<Vec<ServiceIdentity>>;
}

/// Client for the remote identity directory
#[async_trait]
pub trait ServiceProxy: Send + Sync {
    /// Start a fresh paged iteration over all identities
    fn identities_iterator(&self) -> Box<dyn ServiceIdentitiesIterator>;

    /// Look up a single device or module; `Ok(None)` when it does not exist
    async fn get_service_identity(
        &self,
        device_id: &str,
        module_id: Option<&str>,
    ) -> Result<Option<ServiceIdentity>>;
}

/// Iterator over identities already held in memory, served in fixed-size pages
pub struct VecIdentitiesIterator {
    remaining: VecDeque<ServiceIdentity>,
    page_size: usize,
}

impl VecIdentitiesIterator {
    pub fn new(identities: Vec<ServiceIdentity>, page_size: usize) -> Self {
        Self {
            remaining: identities.into(),
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl ServiceIdentitiesIterator for VecIdentitiesIterator {
    fn has_next(&self) -> bool {
        !self.remaining.is_empty()
    }

    async fn get_next(&mut self) -> Result<Vec<ServiceIdentity>> {
        let take = self.page_size.min(self.remaining.len());
        Ok(self.remaining.drain(..take).collect())
    }
}
