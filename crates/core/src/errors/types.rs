//! Core error type definitions

use std::path::PathBuf;

use super::auth_chain::AuthChainError;

/// Result type alias for edgescope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for identity cache operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller supplied a malformed argument (empty id, malformed chain)
    InvalidArgument { name: String, message: String },

    /// The identity exists but may not act in this edge's scope
    DeviceInvalidState { id: String, state: DeviceState },

    /// No valid authentication chain could be computed
    AuthChain(#[source] AuthChainError),

    /// The remote directory failed to answer
    Service {
        operation: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The persistent identity store failed
    Store {
        operation: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    Configuration { message: String },
}

/// Why an identity failed auth-chain state verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Not present in the cache
    NotFound,
    /// Present but disabled
    Disabled,
    /// Present and enabled, but not reachable from the edge root
    NotInScope,
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DeviceState::NotFound => "not found",
            DeviceState::Disabled => "disabled",
            DeviceState::NotInScope => "not in scope",
        };
        f.write_str(text)
    }
}
