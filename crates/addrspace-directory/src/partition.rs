//! The contract every partition of the address space implements.

use addrspace_core::{Edge, NodeId};
use std::sync::Arc;

/// An independently-owned subset of the address space.
///
/// Implementations are supplied by whoever owns the partition; the directory only
/// calls into them. Calls are expected to be local and fast: point queries run on
/// the caller's thread.
pub trait Partition<N>: Send + Sync {
    /// Returns true if this partition owns `node`.
    fn contains_node(&self, node: &NodeId) -> bool;

    /// Returns this partition's copy of `node`, if it still has one.
    fn node(&self, node: &NodeId) -> Option<N>;

    /// Returns every edge this partition holds whose source is `node`.
    fn references(&self, node: &NodeId) -> Vec<Edge>;

    /// Returns the edges from `node` that pass `filter`.
    ///
    /// Partitions with an index on edge kind or direction should override this to
    /// avoid materializing rejected edges.
    fn filtered_references(&self, node: &NodeId, filter: &dyn Fn(&Edge) -> bool) -> Vec<Edge> {
        self.references(node)
            .into_iter()
            .filter(|edge| filter(edge))
            .collect()
    }

    /// Short description used in diagnostics.
    fn describe(&self) -> String {
        "partition".to_string()
    }
}

/// Shared handle to a registered partition.
///
/// Two handles are the same partition only if they share an allocation; see
/// [`same_partition`].
pub type PartitionHandle<N> = Arc<dyn Partition<N>>;

/// Identity comparison for partition handles.
///
/// Compares the data pointer only, so two handles to the same partition created
/// through different trait-object coercions still compare equal.
#[inline]
pub fn same_partition<N>(a: &PartitionHandle<N>, b: &PartitionHandle<N>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
