//! First-match resolution of node ids to the owning partition's copy.

use crate::registry::PartitionRegistry;
use addrspace_core::{NodeId, QualifiedNodeId};
use std::sync::Arc;

/// Resolves node ids against the registered partitions.
///
/// Resolution asks partitions, in registration order, whether they own the node
/// and fetches it from the first one that does. If that partition then has no
/// copy (the node vanished between the ownership check and the fetch), the
/// result is `None`: later partitions are not consulted. This narrow contract
/// is intentional; callers that need a best-effort search must retry.
pub struct EntityResolver<N> {
    registry: Arc<PartitionRegistry<N>>,
}

impl<N> EntityResolver<N> {
    /// Creates a resolver over `registry`.
    pub fn new(registry: Arc<PartitionRegistry<N>>) -> Self {
        Self { registry }
    }

    /// Returns the node from the first registered partition that owns `node`.
    pub fn resolve(&self, node: &NodeId) -> Option<N> {
        let snapshot = self.registry.snapshot();
        let owner = snapshot.iter().find(|p| p.contains_node(node))?;
        let resolved = owner.node(node);

        if resolved.is_none() {
            tracing::debug!(
                node = %node,
                partition = %owner.describe(),
                "Owning partition returned no node"
            );
        }

        resolved
    }

    /// Resolves a qualified id.
    ///
    /// Ids that denote a node outside the local address space resolve to `None`
    /// without consulting any partition.
    pub fn resolve_qualified(&self, node: &QualifiedNodeId) -> Option<N> {
        let local = node.to_local()?;
        self.resolve(&local)
    }
}

impl<N> Clone for EntityResolver<N> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}
