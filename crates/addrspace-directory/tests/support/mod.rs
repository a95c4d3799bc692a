//! Shared fixtures for directory integration tests.

#![allow(dead_code)]

use addrspace_directory::{
    Edge, EdgeAggregator, NodeId, Partition, PartitionHandle, TraversalContext, TraversalEngine,
    ViewSpec,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Entity type used by the fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestNode {
    pub id: NodeId,
    pub name: String,
}

/// In-memory partition with call counters.
pub struct MemoryPartition {
    name: String,
    owned: HashSet<NodeId>,
    nodes: HashMap<NodeId, TestNode>,
    edges: Vec<Edge>,
    pub calls: AtomicUsize,
}

impl MemoryPartition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            owned: HashSet::new(),
            nodes: HashMap::new(),
            edges: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Owns `id` and can fetch it, named `name`.
    pub fn with_node(mut self, id: u64, name: &str) -> Self {
        let id = NodeId::from(id);
        self.owned.insert(id);
        self.nodes.insert(
            id,
            TestNode {
                id,
                name: name.to_string(),
            },
        );
        self
    }

    /// Claims ownership of `id` but has no copy to hand out.
    pub fn claiming(mut self, id: u64) -> Self {
        self.owned.insert(NodeId::from(id));
        self
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn into_handle(self) -> (Arc<Self>, PartitionHandle<TestNode>) {
        let partition = Arc::new(self);
        let handle: PartitionHandle<TestNode> = partition.clone();
        (partition, handle)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Partition<TestNode> for MemoryPartition {
    fn contains_node(&self, node: &NodeId) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.owned.contains(node)
    }

    fn node(&self, node: &NodeId) -> Option<TestNode> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.nodes.get(node).cloned()
    }

    fn references(&self, node: &NodeId) -> Vec<Edge> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.edges
            .iter()
            .filter(|e| e.source == *node)
            .cloned()
            .collect()
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Completes every traversal synchronously with the same edges.
pub struct FixedEngine(pub Vec<Edge>);

impl TraversalEngine<TestNode> for FixedEngine {
    fn traverse(&self, context: TraversalContext<TestNode>, _view: ViewSpec, _node: NodeId) {
        context.complete(self.0.clone());
    }
}

/// Breadth-first walk over forward edges on the tokio runtime.
///
/// Consults the context's registry at each hop, so partitions registered or
/// removed mid-walk are picked up on the next hop.
pub struct BreadthFirstEngine;

impl TraversalEngine<TestNode> for BreadthFirstEngine {
    fn traverse(&self, context: TraversalContext<TestNode>, _view: ViewSpec, node: NodeId) {
        tokio::spawn(async move {
            let aggregator = EdgeAggregator::new(Arc::clone(context.registry()));
            let mut visited = HashSet::from([node]);
            let mut queue = VecDeque::from([node]);
            let mut collected = Vec::new();

            while let Some(current) = queue.pop_front() {
                for edge in aggregator.edges_from_filtered(&current, |e| e.is_forward()) {
                    if let Some(next) = edge.target.to_local() {
                        if visited.insert(next) {
                            queue.push_back(next);
                        }
                    }
                    collected.push(edge);
                }
                tokio::task::yield_now().await;
            }

            context.complete(collected);
        });
    }
}
