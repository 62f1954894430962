//! Authentication chain resolution
//!
//! Walks upward from the target one parent link at a time until the root
//! is reached. Every node on the path must be enabled, every parent reached
//! through a scope must be an edge device, and the number of edge devices on
//! the path may not exceed the configured depth.

use super::node::{IdentityNode, ParentLink};
use super::ServiceIdentityHierarchy;
use edgescope_core::{AuthChain, AuthChainError, ServiceIdentity};
use std::collections::HashSet;

pub(super) fn resolve_chain(
    hierarchy: &ServiceIdentityHierarchy,
    id: &str,
) -> Result<AuthChain, AuthChainError> {
    let mut current = hierarchy.node(id).ok_or_else(|| AuthChainError::NotFound {
        id: id.to_string(),
    })?;

    let mut chain: Vec<&str> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut edge_tiers = 0usize;

    loop {
        let identity = current.identity();
        if !visited.insert(identity.id()) {
            return Err(AuthChainError::Cycle { id: id.to_string() });
        }
        if !identity.is_enabled() {
            return Err(AuthChainError::Disabled {
                id: identity.id().to_string(),
            });
        }
        if identity.is_edge_device() {
            edge_tiers += 1;
            if edge_tiers > hierarchy.max_edge_depth() {
                return Err(AuthChainError::DepthExceeded {
                    id: id.to_string(),
                    max_depth: hierarchy.max_edge_depth(),
                });
            }
        }
        chain.push(identity.id());

        if identity.id() == hierarchy.root_id() {
            break;
        }
        current = parent_node(hierarchy, current)?;
    }

    // Every segment is a validated, non-empty id.
    AuthChain::from_ids(chain).map_err(|_| AuthChainError::NotFound { id: id.to_string() })
}

/// Parent identity of `node`, or why it cannot be reached
pub(super) fn parent_of<'a>(
    hierarchy: &'a ServiceIdentityHierarchy,
    node: &IdentityNode,
) -> Result<&'a ServiceIdentity, AuthChainError> {
    parent_node(hierarchy, node).map(IdentityNode::identity)
}

fn parent_node<'a>(
    hierarchy: &'a ServiceIdentityHierarchy,
    node: &IdentityNode,
) -> Result<&'a IdentityNode, AuthChainError> {
    let id = node.identity().id();
    match node.parent() {
        ParentLink::Device(device_id) => {
            hierarchy
                .node(device_id)
                .ok_or_else(|| AuthChainError::MissingDevice {
                    id: id.to_string(),
                    device_id: device_id.clone(),
                })
        }
        ParentLink::Scopes(scopes) => {
            let owner = scopes
                .iter()
                .find_map(|scope| hierarchy.scope_owner(scope))
                .ok_or_else(|| AuthChainError::MissingParent {
                    id: id.to_string(),
                    scope: scopes.first().cloned().unwrap_or_default(),
                })?;
            if !owner.is_edge_device() {
                return Err(AuthChainError::NotEdge {
                    id: owner.id().to_string(),
                });
            }
            hierarchy
                .node(owner.id())
                .ok_or_else(|| AuthChainError::MissingParent {
                    id: id.to_string(),
                    scope: scopes.first().cloned().unwrap_or_default(),
                })
        }
        ParentLink::None => Err(AuthChainError::Orphaned { id: id.to_string() }),
    }
}
