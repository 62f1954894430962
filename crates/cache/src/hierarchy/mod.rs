//! Service identity hierarchy
//!
//! An in-memory forest of devices and modules. Nodes are stored by id and
//! linked upward through scopes: a device names the scopes it belongs under,
//! and an edge device owns at most one scope. Links are resolved on every
//! query, so nodes may arrive in any order and re-parenting an identity is a
//! plain overwrite of its node.

mod node;
mod resolve;

use edgescope_core::{AuthChain, AuthChainError, ServiceIdentity, DEFAULT_MAX_EDGE_DEPTH};
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

pub(crate) use node::IdentityNode;

/// Forest of service identities rooted at the local edge device
#[derive(Debug, Clone)]
pub struct ServiceIdentityHierarchy {
    /// Id of the trusted root every chain must terminate at
    root_id: String,
    /// Maximum number of edge devices on a chain, root included
    max_edge_depth: usize,
    /// Nodes keyed by identity id
    nodes: HashMap<String, IdentityNode>,
    /// Scope -> ids of the devices claiming to own it
    scope_claims: HashMap<String, BTreeSet<String>>,
}

impl ServiceIdentityHierarchy {
    /// Create an empty hierarchy rooted at `root_id`
    pub fn new(root_id: impl Into<String>) -> Self {
        Self::with_max_edge_depth(root_id, DEFAULT_MAX_EDGE_DEPTH)
    }

    pub fn with_max_edge_depth(root_id: impl Into<String>, max_edge_depth: usize) -> Self {
        Self {
            root_id: root_id.into(),
            max_edge_depth,
            nodes: HashMap::new(),
            scope_claims: HashMap::new(),
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn max_edge_depth(&self) -> usize {
        self.max_edge_depth
    }

    /// Insert a new identity or replace the one stored under the same id.
    ///
    /// Returns the previously stored identity, if any.
    pub fn insert_or_update(&mut self, identity: ServiceIdentity) -> Option<ServiceIdentity> {
        let id = identity.id().to_string();
        let previous = self.nodes.remove(&id).map(IdentityNode::into_identity);

        if let Some(scope) = previous.as_ref().and_then(|p| p.device_scope()) {
            self.release_scope(scope, &id);
        }
        if let Some(scope) = owned_scope(&identity) {
            self.scope_claims
                .entry(scope.to_string())
                .or_default()
                .insert(id.clone());
        }

        trace!(id = %id, replaced = previous.is_some(), "Hierarchy node stored");
        self.nodes.insert(id, IdentityNode::new(identity));
        previous
    }

    /// Remove an identity. Descendants stay stored but lose their chain.
    pub fn remove(&mut self, id: &str) -> Option<ServiceIdentity> {
        let removed = self.nodes.remove(id).map(IdentityNode::into_identity)?;
        if let Some(scope) = removed.device_scope() {
            self.release_scope(scope, id);
        }
        trace!(id = %id, "Hierarchy node removed");
        Some(removed)
    }

    /// Stored identity regardless of chain validity
    pub fn get(&self, id: &str) -> Option<&ServiceIdentity> {
        self.nodes.get(id).map(IdentityNode::identity)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every stored id, sorted
    pub fn get_all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Chain for `id`, or `None` when it is unknown or unauthorized
    pub fn get_auth_chain(&self, id: &str) -> Option<AuthChain> {
        self.try_get_auth_chain(id).ok()
    }

    /// Chain for `id`, with the reason when none exists
    pub fn try_get_auth_chain(&self, id: &str) -> Result<AuthChain, AuthChainError> {
        resolve::resolve_chain(self, id)
    }

    /// Ids whose parent link resolves directly to `id`, sorted
    pub fn get_immediate_children(&self, id: &str) -> Vec<String> {
        let mut children: Vec<String> = self
            .nodes
            .values()
            .filter(|node| node.identity().id() != id)
            .filter(|node| {
                matches!(resolve::parent_of(self, node), Ok(parent) if parent.id() == id)
            })
            .map(|node| node.identity().id().to_string())
            .collect();
        children.sort();
        children
    }

    /// Current owner of `scope`: edge devices win over plain claimants,
    /// then the lowest id.
    pub(crate) fn scope_owner(&self, scope: &str) -> Option<&ServiceIdentity> {
        let claimants = self.scope_claims.get(scope)?;
        let mut fallback = None;
        for id in claimants {
            let Some(identity) = self.get(id) else {
                continue;
            };
            if identity.is_edge_device() {
                return Some(identity);
            }
            fallback = fallback.or(Some(identity));
        }
        fallback
    }

    pub(crate) fn node(&self, id: &str) -> Option<&IdentityNode> {
        self.nodes.get(id)
    }

    fn release_scope(&mut self, scope: &str, id: &str) {
        if let Some(claimants) = self.scope_claims.get_mut(scope) {
            claimants.remove(id);
            if claimants.is_empty() {
                self.scope_claims.remove(scope);
            }
        }
    }
}

/// Scope an identity claims to own; modules never own scopes
fn owned_scope(identity: &ServiceIdentity) -> Option<&str> {
    if identity.is_module() {
        return None;
    }
    identity.device_scope()
}
