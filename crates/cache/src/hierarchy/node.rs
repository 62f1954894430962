//! Hierarchy node storage

use edgescope_core::ServiceIdentity;

/// How a node links to its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParentLink {
    /// Modules hang off the device that hosts them
    Device(String),
    /// Devices hang off whichever edge owns one of these scopes, in order
    Scopes(Vec<String>),
    /// No parent declared
    None,
}

#[derive(Debug, Clone)]
pub(crate) struct IdentityNode {
    identity: ServiceIdentity,
    parent: ParentLink,
}

impl IdentityNode {
    pub fn new(identity: ServiceIdentity) -> Self {
        let parent = if identity.is_module() {
            ParentLink::Device(identity.device_id().to_string())
        } else if identity.parent_scopes().is_empty() {
            ParentLink::None
        } else {
            ParentLink::Scopes(identity.parent_scopes().to_vec())
        };
        Self { identity, parent }
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn parent(&self) -> &ParentLink {
        &self.parent
    }

    pub fn into_identity(self) -> ServiceIdentity {
        self.identity
    }
}
