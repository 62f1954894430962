//! Device-scope identities cache
//!
//! Keeps a local copy of every identity the directory places under this
//! edge device, refreshes it on a schedule or on demand, answers
//! authentication-chain queries from memory and persists a snapshot so a
//! restarted edge can authenticate children before the directory is reachable.

mod background;
mod builder;
mod queries;
mod refresh;
mod status;
mod targeted;
mod types;

pub use builder::DeviceScopeIdentitiesCacheBuilder;
pub use status::RefreshStatus;
pub use types::DeviceScopeIdentitiesCache;
