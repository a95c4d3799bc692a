//! # Addrspace Directory
//!
//! A federated directory in front of independently-owned partitions of an
//! address space.
//!
//! Partitions implement [`Partition`] and are registered with a
//! [`PartitionRegistry`]. On top of the registry the directory offers:
//! - [`EntityResolver`] - first-match resolution of a node to its owner's copy
//! - [`EdgeAggregator`] - the edges of a node collected from every partition
//! - [`TraversalCoordinator`] - hand-off of recursive traversals to a
//!   [`TraversalEngine`], observed through a [`TraversalFuture`]
//!
//! [`Directory`] bundles all of them behind one shared registry.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Directory                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │EntityResolver│  │EdgeAggregator│  │TraversalCoordinator│──┼──► TraversalEngine
//! │  └──────┬───────┘  └──────┬───────┘  └─────────┬──────────┘  │
//! │         └─────────────────┼────────────────────┘             │
//! │                   ┌───────▼─────────┐                        │
//! │                   │PartitionRegistry│  snapshot per call     │
//! │                   └───────┬─────────┘                        │
//! └───────────────────────────┼──────────────────────────────────┘
//!              ┌──────────────┼──────────────┐
//!         Partition 0    Partition 1    Partition 2
//! ```

pub mod aggregator;
pub mod config;
pub mod directory;
pub mod logging;
pub mod partition;
pub mod registry;
pub mod resolver;
pub mod traversal;

// Re-exports
pub use addrspace_core::{
    Direction, Edge, NodeId, QualifiedNodeId, RemoteQualifier, TraversalError, ViewSpec,
};
pub use aggregator::EdgeAggregator;
pub use config::{ConfigError, DirectoryConfig, LoggingConfig, RegistryConfig};
pub use directory::Directory;
pub use partition::{Partition, PartitionHandle, same_partition};
pub use registry::{PartitionRegistry, Registration, RegistrySnapshot, Unregistration};
pub use resolver::EntityResolver;
pub use traversal::{
    AccessScope, Session, TraversalContext, TraversalCoordinator, TraversalEngine,
    TraversalFuture, TraversalScope,
};
