//! Persistent identity storage
//!
//! The cache serializes each identity into a versioned envelope and hands
//! the bytes to an [`IdentityStore`] keyed by identity id. On startup the
//! store is read back so a restart does not present an empty directory.

mod envelope;
mod file;
mod memory;

pub use envelope::StoredServiceIdentity;
pub use file::FileIdentityStore;
pub use memory::InMemoryIdentityStore;

use async_trait::async_trait;
use edgescope_core::Result;

/// Key/value store for serialized identities
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Store `value` under `id`, replacing any previous value
    async fn put(&self, id: &str, value: Vec<u8>) -> Result<()>;

    /// Delete the value under `id`; deleting a missing key succeeds
    async fn remove(&self, id: &str) -> Result<()>;

    /// Every stored `(id, value)` pair
    async fn get_all(&self) -> Result<Vec<(String, Vec<u8>)>>;
}
