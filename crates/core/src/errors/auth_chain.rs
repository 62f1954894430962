//! Failures surfaced when resolving an authentication chain

/// Reason an identity has no usable authentication chain.
///
/// `NotFound` means the identity is unknown; every other variant means the
/// identity exists but is not authorized through the current hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthChainError {
    #[error("identity '{id}' not found")]
    NotFound { id: String },

    #[error("identity '{id}' is disabled")]
    Disabled { id: String },

    #[error("identity '{id}' has no parent reachable through scope '{scope}'")]
    MissingParent { id: String, scope: String },

    #[error("module '{id}' belongs to device '{device_id}', which is not cached")]
    MissingDevice { id: String, device_id: String },

    #[error("identity '{id}' has no parent scope")]
    Orphaned { id: String },

    #[error("identity '{id}' acts as a parent but is not an edge device")]
    NotEdge { id: String },

    #[error("chain for '{id}' exceeds the maximum of {max_depth} edge tiers")]
    DepthExceeded { id: String, max_depth: usize },

    #[error("cycle detected while resolving chain for '{id}'")]
    Cycle { id: String },
}

impl AuthChainError {
    /// True when the identity itself is unknown, as opposed to known but unauthorized
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthChainError::NotFound { .. })
    }
}
