//! Single entry point over the registry and its read operations.

use crate::aggregator::EdgeAggregator;
use crate::config::DirectoryConfig;
use crate::partition::PartitionHandle;
use crate::registry::{PartitionRegistry, Registration, RegistrySnapshot, Unregistration};
use crate::resolver::EntityResolver;
use crate::traversal::{AccessScope, TraversalCoordinator, TraversalEngine, TraversalFuture};
use addrspace_core::{Edge, NodeId, QualifiedNodeId, ViewSpec};
use std::sync::Arc;

/// Federated directory over independently-owned partitions.
///
/// Owns the shared [`PartitionRegistry`]; partitions come and go through
/// [`register`](Self::register) and [`unregister`](Self::unregister) while point
/// queries and traversals run concurrently against snapshots of it.
///
/// # Example
///
/// ```ignore
/// let directory = Directory::new(engine);
/// directory.register(plant_partition.clone());
///
/// let node = directory.resolve(&NodeId::new(2, 1001));
/// let edges = directory.edges_from(&NodeId::new(2, 1001));
/// let all = directory.traverse_all(&AccessScope::anonymous(), &NodeId::new(0, 85)).await?;
/// ```
pub struct Directory<N> {
    registry: Arc<PartitionRegistry<N>>,
    resolver: EntityResolver<N>,
    aggregator: EdgeAggregator<N>,
    coordinator: TraversalCoordinator<N>,
}

impl<N> Directory<N> {
    /// Creates a directory with default configuration.
    pub fn new(engine: Arc<dyn TraversalEngine<N>>) -> Self {
        Self::with_config(engine, &DirectoryConfig::default())
    }

    /// Creates a directory from configuration.
    pub fn with_config(engine: Arc<dyn TraversalEngine<N>>, config: &DirectoryConfig) -> Self {
        let registry = Arc::new(PartitionRegistry::with_capacity(
            config.registry.initial_capacity,
        ));

        Self {
            resolver: EntityResolver::new(Arc::clone(&registry)),
            aggregator: EdgeAggregator::with_fanout_threshold(
                Arc::clone(&registry),
                config.registry.fanout_warn_threshold,
            ),
            coordinator: TraversalCoordinator::new(Arc::clone(&registry), engine),
            registry,
        }
    }

    /// The shared registry, for engines and owners that need it directly.
    pub fn registry(&self) -> &Arc<PartitionRegistry<N>> {
        &self.registry
    }

    /// Registers a partition; see [`PartitionRegistry::register`].
    pub fn register(&self, partition: PartitionHandle<N>) -> Registration {
        self.registry.register(partition)
    }

    /// Removes a partition; see [`PartitionRegistry::unregister`].
    pub fn unregister(&self, partition: &PartitionHandle<N>) -> Unregistration {
        self.registry.unregister(partition)
    }

    /// Current partitions in registration order.
    pub fn snapshot(&self) -> RegistrySnapshot<N> {
        self.registry.snapshot()
    }

    /// See [`EntityResolver::resolve`].
    pub fn resolve(&self, node: &NodeId) -> Option<N> {
        self.resolver.resolve(node)
    }

    /// See [`EntityResolver::resolve_qualified`].
    pub fn resolve_qualified(&self, node: &QualifiedNodeId) -> Option<N> {
        self.resolver.resolve_qualified(node)
    }

    /// See [`EdgeAggregator::edges_from`].
    pub fn edges_from(&self, node: &NodeId) -> Vec<Edge> {
        self.aggregator.edges_from(node)
    }

    /// See [`EdgeAggregator::edges_from_filtered`].
    pub fn edges_from_filtered<F>(&self, node: &NodeId, filter: F) -> Vec<Edge>
    where
        F: Fn(&Edge) -> bool,
    {
        self.aggregator.edges_from_filtered(node, filter)
    }

    /// See [`TraversalCoordinator::traverse_all`].
    pub fn traverse_all(&self, scope: &AccessScope, node: &NodeId) -> TraversalFuture {
        self.coordinator.traverse_all(scope, node)
    }

    /// See [`TraversalCoordinator::traverse_all_with_view`].
    pub fn traverse_all_with_view(
        &self,
        scope: &AccessScope,
        view: ViewSpec,
        node: &NodeId,
    ) -> TraversalFuture {
        self.coordinator.traverse_all_with_view(scope, view, node)
    }

    /// The resolver backing [`resolve`](Self::resolve).
    pub fn resolver(&self) -> &EntityResolver<N> {
        &self.resolver
    }

    /// The aggregator backing [`edges_from`](Self::edges_from).
    pub fn aggregator(&self) -> &EdgeAggregator<N> {
        &self.aggregator
    }
}

impl<N> std::fmt::Debug for Directory<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
