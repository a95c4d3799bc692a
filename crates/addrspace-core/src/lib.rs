//! # Addrspace Core
//!
//! Core value types shared by every partition of a federated address space.
//!
//! This crate provides the fundamental building blocks:
//! - [`NodeId`] and [`QualifiedNodeId`] - Type-safe identifiers
//! - [`Edge`] and [`Direction`] - Relationship records produced by partitions
//! - [`ViewSpec`] - View parameters that scope a traversal
//! - [`TraversalError`] - Faults reported by a traversal engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;
use thiserror::Error;

// =============================================================================
// Identifiers (Newtypes for type safety)
// =============================================================================

/// Identifies an addressable node within the local address space.
///
/// A node is named by the namespace it lives in plus a numeric key. The pair is
/// opaque to the directory: it is only compared and hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index.
    pub namespace: u16,
    /// Key within the namespace.
    pub key: u64,
}

impl NodeId {
    /// Creates a new NodeId.
    #[inline]
    pub const fn new(namespace: u16, key: u64) -> Self {
        Self { namespace, key }
    }

    /// Returns the namespace index.
    #[inline]
    pub const fn namespace(self) -> u16 {
        self.namespace
    }

    /// Returns the key within the namespace.
    #[inline]
    pub const fn key(self) -> u64 {
        self.key
    }

    /// Wraps this id as a local [`QualifiedNodeId`].
    #[inline]
    pub fn qualified(self) -> QualifiedNodeId {
        QualifiedNodeId::local(self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns{}:{}", self.namespace, self.key)
    }
}

impl From<u64> for NodeId {
    /// Places the key in namespace 0.
    #[inline]
    fn from(key: u64) -> Self {
        Self::new(0, key)
    }
}

impl From<(u16, u64)> for NodeId {
    #[inline]
    fn from((namespace, key): (u16, u64)) -> Self {
        Self::new(namespace, key)
    }
}

/// Locates a node that may live outside the local address space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteQualifier {
    /// Index of the owning system. `0` is the local system.
    pub system_index: u32,
    /// Namespace URI, used instead of the local namespace table.
    pub namespace_uri: Option<String>,
}

impl RemoteQualifier {
    /// Qualifier pointing at another system by index.
    pub fn system(system_index: u32) -> Self {
        Self {
            system_index,
            namespace_uri: None,
        }
    }

    /// Qualifier naming the namespace by URI.
    pub fn namespace_uri(uri: impl Into<String>) -> Self {
        Self {
            system_index: 0,
            namespace_uri: Some(uri.into()),
        }
    }

    /// Returns true if this qualifier still denotes the local system with the
    /// local namespace table.
    #[inline]
    pub fn is_local(&self) -> bool {
        self.system_index == 0 && self.namespace_uri.is_none()
    }
}

/// A [`NodeId`] optionally qualified with a remote location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedNodeId {
    /// The node id relative to its owner.
    pub node: NodeId,
    /// Remote location, if any.
    pub remote: Option<RemoteQualifier>,
}

impl QualifiedNodeId {
    /// Creates a qualified id that denotes a local node.
    pub fn local(node: impl Into<NodeId>) -> Self {
        Self {
            node: node.into(),
            remote: None,
        }
    }

    /// Creates a qualified id with a remote qualifier.
    pub fn remote(node: impl Into<NodeId>, remote: RemoteQualifier) -> Self {
        Self {
            node: node.into(),
            remote: Some(remote),
        }
    }

    /// Reduces this id to a local [`NodeId`].
    ///
    /// Returns `None` when the id denotes a node outside the local address space.
    pub fn to_local(&self) -> Option<NodeId> {
        match &self.remote {
            None => Some(self.node),
            Some(q) if q.is_local() => Some(self.node),
            Some(_) => None,
        }
    }

    /// Returns true if [`to_local`](Self::to_local) would succeed.
    #[inline]
    pub fn is_local(&self) -> bool {
        self.to_local().is_some()
    }
}

impl From<NodeId> for QualifiedNodeId {
    fn from(node: NodeId) -> Self {
        Self::local(node)
    }
}

impl fmt::Display for QualifiedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.remote {
            None => write!(f, "{}", self.node),
            Some(RemoteQualifier {
                system_index,
                namespace_uri: Some(uri),
            }) => write!(f, "svr{}/{}/{}", system_index, uri, self.node.key),
            Some(RemoteQualifier {
                system_index,
                namespace_uri: None,
            }) => write!(f, "svr{}/{}", system_index, self.node),
        }
    }
}

// =============================================================================
// Edge Definition
// =============================================================================

/// Direction of an edge relative to its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    /// Source refers to target.
    #[default]
    Forward,
    /// Target refers to source; the edge is reported from the target's side.
    Inverse,
}

/// A directed relationship between two nodes.
///
/// Edges are produced by partitions and passed through the directory unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID
    pub source: NodeId,
    /// Target node, possibly in another system
    pub target: QualifiedNodeId,
    /// Relationship kind
    pub kind: NodeId,
    /// Direction relative to `source`
    pub direction: Direction,
}

impl Edge {
    /// Creates a forward edge to a local target.
    pub fn new(
        source: impl Into<NodeId>,
        kind: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            source: source.into(),
            target: QualifiedNodeId::local(target),
            kind: kind.into(),
            direction: Direction::Forward,
        }
    }

    /// Creates an inverse edge to a local target.
    pub fn inverse(
        source: impl Into<NodeId>,
        kind: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            direction: Direction::Inverse,
            ..Self::new(source, kind, target)
        }
    }

    /// Creates a forward edge to a possibly remote target.
    pub fn qualified(
        source: impl Into<NodeId>,
        kind: impl Into<NodeId>,
        target: QualifiedNodeId,
    ) -> Self {
        Self {
            source: source.into(),
            target,
            kind: kind.into(),
            direction: Direction::Forward,
        }
    }

    #[inline]
    pub fn is_forward(&self) -> bool {
        self.direction == Direction::Forward
    }

    #[inline]
    pub fn is_inverse(&self) -> bool {
        self.direction == Direction::Inverse
    }

    /// Returns true if the target lives in the local address space.
    #[inline]
    pub fn is_local_target(&self) -> bool {
        self.target.is_local()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Forward => write!(f, "{} -[{}]-> {}", self.source, self.kind, self.target),
            Direction::Inverse => write!(f, "{} <-[{}]- {}", self.source, self.kind, self.target),
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Parameters that scope how a traversal interprets the address space.
///
/// The default value places no restriction: no view node, no as-of time,
/// version 0.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewSpec {
    /// View node restricting the traversal (None = whole address space)
    pub view_id: Option<NodeId>,
    /// Point in time the traversal should observe (None = now)
    pub as_of: Option<SystemTime>,
    /// View version (0 = latest)
    pub version: u32,
}

impl ViewSpec {
    /// Creates a view restricted to `view_id`.
    pub fn new(view_id: impl Into<NodeId>) -> Self {
        Self {
            view_id: Some(view_id.into()),
            ..Self::default()
        }
    }

    /// Sets the as-of time.
    pub fn with_as_of(mut self, as_of: SystemTime) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Sets the view version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Returns true if this is the unrestricted default view.
    pub fn is_default(&self) -> bool {
        self.view_id.is_none() && self.as_of.is_none() && self.version == 0
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Faults a traversal engine may complete a traversal with.
///
/// The directory passes these through to the caller without interpreting them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    /// The caller's session may not browse the node
    #[error("Access denied to {0}")]
    AccessDenied(NodeId),

    /// The starting node is unknown or malformed
    #[error("Invalid node {0}")]
    InvalidNode(NodeId),

    /// The engine failed while walking edges
    #[error("Traversal engine failure: {0}")]
    Engine(String),

    /// The engine dropped the traversal without completing it
    #[error("Traversal abandoned before completion")]
    Abandoned,
}

/// Result type for traversals.
pub type Result<T> = std::result::Result<T, TraversalError>;

// =============================================================================
// Tests
// =============================================================================
