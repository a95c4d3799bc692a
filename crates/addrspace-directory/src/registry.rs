//! Ordered, concurrency-safe registry of partitions.
//!
//! The registry holds its partitions as an immutable, shared list. Mutations take
//! the write lock, build a new list and swap it in; readers clone the current
//! list's `Arc` and iterate it without holding any lock. A snapshot therefore
//! never observes a half-applied mutation and is unaffected by later ones.

use crate::partition::{PartitionHandle, same_partition};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Outcome of [`PartitionRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The partition was appended to the registry.
    Added,
    /// The partition was already registered; nothing changed.
    AlreadyRegistered,
}

/// Outcome of [`PartitionRegistry::unregister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unregistration {
    /// The partition was removed from the registry.
    Removed,
    /// The partition was not registered; nothing changed.
    NotRegistered,
}

/// Immutable view of the registered partitions, in registration order.
pub struct RegistrySnapshot<N> {
    partitions: Arc<Vec<PartitionHandle<N>>>,
}

impl<N> RegistrySnapshot<N> {
    /// Number of partitions in the snapshot.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Returns true if the snapshot holds no partitions.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Iterates partitions in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PartitionHandle<N>> {
        self.partitions.iter()
    }

    /// Returns true if `handle` is part of this snapshot.
    pub fn contains(&self, handle: &PartitionHandle<N>) -> bool {
        self.partitions.iter().any(|p| same_partition(p, handle))
    }
}

impl<N> Clone for RegistrySnapshot<N> {
    fn clone(&self) -> Self {
        Self {
            partitions: Arc::clone(&self.partitions),
        }
    }
}

impl<'a, N> IntoIterator for &'a RegistrySnapshot<N> {
    type Item = &'a PartitionHandle<N>;
    type IntoIter = std::slice::Iter<'a, PartitionHandle<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N> fmt::Debug for RegistrySnapshot<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.partitions.iter().map(|p| p.describe()))
            .finish()
    }
}

/// The set of partitions the directory federates.
///
/// Registration order is resolution priority: the first registered partition that
/// owns a node wins. A partition appears at most once, compared by identity.
pub struct PartitionRegistry<N> {
    partitions: RwLock<Arc<Vec<PartitionHandle<N>>>>,
}

impl<N> PartitionRegistry<N> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty registry sized for `capacity` partitions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            partitions: RwLock::new(Arc::new(Vec::with_capacity(capacity))),
        }
    }

    /// Registers `handle` at the end of the resolution order.
    ///
    /// Registering a partition that is already present leaves the registry
    /// unchanged and logs a warning.
    pub fn register(&self, handle: PartitionHandle<N>) -> Registration {
        let mut guard = self.partitions.write().unwrap_or_else(PoisonError::into_inner);

        if guard.iter().any(|p| same_partition(p, &handle)) {
            tracing::warn!(partition = %handle.describe(), "Partition already registered");
            return Registration::AlreadyRegistered;
        }

        tracing::debug!(
            partition = %handle.describe(),
            registered = guard.len() + 1,
            "Partition registered"
        );
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(handle);
        *guard = Arc::new(next);

        Registration::Added
    }

    /// Removes `handle`, keeping the order of the remaining partitions.
    ///
    /// Unregistering a partition that is not present leaves the registry
    /// unchanged and logs a warning.
    pub fn unregister(&self, handle: &PartitionHandle<N>) -> Unregistration {
        let mut guard = self.partitions.write().unwrap_or_else(PoisonError::into_inner);

        let Some(position) = guard.iter().position(|p| same_partition(p, handle)) else {
            tracing::warn!(partition = %handle.describe(), "Partition not registered");
            return Unregistration::NotRegistered;
        };

        let next: Vec<_> = guard
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(_, p)| Arc::clone(p))
            .collect();
        tracing::debug!(
            partition = %handle.describe(),
            registered = next.len(),
            "Partition unregistered"
        );
        *guard = Arc::new(next);

        Unregistration::Removed
    }

    /// Returns the partitions registered at the time of the call.
    pub fn snapshot(&self) -> RegistrySnapshot<N> {
        let guard = self.partitions.read().unwrap_or_else(PoisonError::into_inner);
        RegistrySnapshot {
            partitions: Arc::clone(&*guard),
        }
    }

    /// Number of registered partitions.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns true if no partitions are registered.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Returns true if `handle` is currently registered.
    pub fn contains(&self, handle: &PartitionHandle<N>) -> bool {
        self.snapshot().contains(handle)
    }
}

impl<N> Default for PartitionRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for PartitionRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionRegistry")
            .field("partitions", &self.snapshot())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;
    use addrspace_core::{Edge, NodeId};
    use std::io;
    use std::sync::Mutex;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` under a subscriber that records WARN and above.
    fn capture_warnings(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.text()
    }

    struct Named(&'static str);

    impl Partition<()> for Named {
        fn contains_node(&self, _node: &NodeId) -> bool {
            false
        }

        fn node(&self, _node: &NodeId) -> Option<()> {
            None
        }

        fn references(&self, _node: &NodeId) -> Vec<Edge> {
            Vec::new()
        }

        fn describe(&self) -> String {
            self.0.to_string()
        }
    }

    fn handle(name: &'static str) -> PartitionHandle<()> {
        Arc::new(Named(name))
    }

    fn names(snapshot: &RegistrySnapshot<()>) -> Vec<String> {
        snapshot.iter().map(|p| p.describe()).collect()
    }

    #[test]
    fn test_register_preserves_order() {
        let registry = PartitionRegistry::new();
        assert!(registry.is_empty());

        registry.register(handle("a"));
        registry.register(handle("b"));
        registry.register(handle("c"));

        assert_eq!(registry.len(), 3);
        assert_eq!(names(&registry.snapshot()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_register_is_ignored() {
        let registry = PartitionRegistry::new();
        let a = handle("a");

        assert_eq!(registry.register(Arc::clone(&a)), Registration::Added);
        assert_eq!(registry.register(Arc::clone(&a)), Registration::AlreadyRegistered);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_equal_fields_are_distinct_partitions() {
        // Identity, not contents, decides uniqueness
        let registry = PartitionRegistry::new();
        assert_eq!(registry.register(handle("same")), Registration::Added);
        assert_eq!(registry.register(handle("same")), Registration::Added);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister() {
        let registry = PartitionRegistry::new();
        let a = handle("a");
        let b = handle("b");
        let c = handle("c");
        registry.register(Arc::clone(&a));
        registry.register(Arc::clone(&b));
        registry.register(Arc::clone(&c));

        assert_eq!(registry.unregister(&b), Unregistration::Removed);
        assert_eq!(names(&registry.snapshot()), vec!["a", "c"]);
        assert!(!registry.contains(&b));

        assert_eq!(registry.unregister(&b), Unregistration::NotRegistered);
        assert_eq!(names(&registry.snapshot()), vec!["a", "c"]);
    }

    #[test]
    fn test_unregister_absent_leaves_registry_unchanged() {
        let registry = PartitionRegistry::new();
        registry.register(handle("a"));

        let stranger = handle("stranger");
        assert_eq!(registry.unregister(&stranger), Unregistration::NotRegistered);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_mutations() {
        let registry = PartitionRegistry::new();
        let a = handle("a");
        registry.register(Arc::clone(&a));

        let before = registry.snapshot();
        registry.register(handle("b"));
        registry.unregister(&a);

        assert_eq!(names(&before), vec!["a"]);
        assert!(before.contains(&a));
        assert_eq!(names(&registry.snapshot()), vec!["b"]);
    }

    #[test]
    fn test_reregister_moves_to_end() {
        let registry = PartitionRegistry::new();
        let a = handle("a");
        registry.register(Arc::clone(&a));
        registry.register(handle("b"));

        registry.unregister(&a);
        registry.register(Arc::clone(&a));

        assert_eq!(names(&registry.snapshot()), vec!["b", "a"]);
    }

    #[test]
    fn test_debug_lists_partitions() {
        let registry = PartitionRegistry::new();
        registry.register(handle("a"));
        let debug = format!("{:?}", registry);
        assert!(debug.contains("PartitionRegistry"));
        assert!(debug.contains("\"a\""));
    }

    #[test]
    fn test_duplicate_register_emits_one_warning() {
        let registry = PartitionRegistry::new();
        let a = handle("plant");

        let output = capture_warnings(|| {
            registry.register(Arc::clone(&a));
            registry.register(Arc::clone(&a));
        });

        assert_eq!(output.matches("Partition already registered").count(), 1);
        assert_eq!(output.matches("WARN").count(), 1);
        assert!(output.contains("partition=plant"));
    }

    #[test]
    fn test_absent_unregister_emits_one_warning() {
        let registry = PartitionRegistry::new();
        let a = handle("plant");
        registry.register(Arc::clone(&a));

        let output = capture_warnings(|| {
            registry.unregister(&a);
            registry.unregister(&a);
        });

        assert_eq!(output.matches("Partition not registered").count(), 1);
        assert_eq!(output.matches("WARN").count(), 1);
        assert!(output.contains("partition=plant"));
    }
}
