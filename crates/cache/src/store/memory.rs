//! In-memory identity store, used when no store directory is configured

use super::IdentityStore;
use async_trait::async_trait;
use dashmap::DashMap;
use edgescope_core::Result;

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    entries: DashMap<String, Vec<u8>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn put(&self, id: &str, value: Vec<u8>) -> Result<()> {
        self.entries.insert(id.to_string(), value);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.entries.remove(id);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }
}
