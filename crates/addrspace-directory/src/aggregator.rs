//! Edge aggregation across every registered partition.

use crate::registry::{PartitionRegistry, RegistrySnapshot};
use addrspace_core::{Edge, NodeId};
use std::sync::Arc;

/// Collects the edges of a node from all partitions.
///
/// Every partition in the snapshot is asked, whether or not it owns the node,
/// since a partition may hold edges whose source lives elsewhere. Results are
/// concatenated in registration order and never deduplicated: identical edges
/// reported by two partitions both appear.
pub struct EdgeAggregator<N> {
    registry: Arc<PartitionRegistry<N>>,
    fanout_warn_threshold: usize,
}

impl<N> EdgeAggregator<N> {
    /// Creates an aggregator over `registry`.
    pub fn new(registry: Arc<PartitionRegistry<N>>) -> Self {
        Self::with_fanout_threshold(registry, usize::MAX)
    }

    /// Creates an aggregator that logs fan-outs wider than `threshold` partitions.
    pub fn with_fanout_threshold(registry: Arc<PartitionRegistry<N>>, threshold: usize) -> Self {
        Self {
            registry,
            fanout_warn_threshold: threshold,
        }
    }

    /// Returns every edge whose source is `node`, from all partitions.
    pub fn edges_from(&self, node: &NodeId) -> Vec<Edge> {
        let snapshot = self.snapshot_for(node);
        let mut edges = Vec::new();
        for partition in &snapshot {
            edges.extend(partition.references(node));
        }
        edges
    }

    /// Returns the edges from `node` that pass `filter`.
    ///
    /// Each partition applies the filter itself; the aggregator only concatenates.
    pub fn edges_from_filtered<F>(&self, node: &NodeId, filter: F) -> Vec<Edge>
    where
        F: Fn(&Edge) -> bool,
    {
        let snapshot = self.snapshot_for(node);
        let mut edges = Vec::new();
        for partition in &snapshot {
            edges.extend(partition.filtered_references(node, &filter));
        }
        edges
    }

    fn snapshot_for(&self, node: &NodeId) -> RegistrySnapshot<N> {
        let snapshot = self.registry.snapshot();
        if snapshot.len() > self.fanout_warn_threshold {
            tracing::debug!(
                node = %node,
                partitions = snapshot.len(),
                threshold = self.fanout_warn_threshold,
                "Wide edge fan-out"
            );
        }
        snapshot
    }
}

impl<N> Clone for EdgeAggregator<N> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            fanout_warn_threshold: self.fanout_warn_threshold,
        }
    }
}
