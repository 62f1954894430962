//! Device-scope service identity cache for edgescope
//!
//! This crate keeps an edge device's view of the identities it may
//! authenticate:
//! - `hierarchy`: in-memory forest of devices and modules with
//!   authentication-chain resolution
//! - `service`: the remote directory collaborator
//! - `store`: persisted identity snapshots (file-backed or in-memory)
//! - `identities`: the [`DeviceScopeIdentitiesCache`] orchestrator
//! - `config`: configuration, builder and environment loading

pub mod config;
pub mod hierarchy;
pub mod identities;
pub mod service;
pub mod store;

pub use config::{
    ConfigSource, IdentityCacheConfig, IdentityCacheConfigBuilder, IdentityCacheConfigLoader,
};
pub use hierarchy::ServiceIdentityHierarchy;
pub use identities::{DeviceScopeIdentitiesCache, DeviceScopeIdentitiesCacheBuilder, RefreshStatus};
pub use service::{ServiceIdentitiesIterator, ServiceProxy, VecIdentitiesIterator};
pub use store::{FileIdentityStore, IdentityStore, InMemoryIdentityStore, StoredServiceIdentity};

pub use edgescope_core::{
    AuthChain, AuthChainError, Error, EventBus, IdentityEvent, Result, ServiceAuthentication,
    ServiceIdentity, ServiceIdentityStatus,
};
