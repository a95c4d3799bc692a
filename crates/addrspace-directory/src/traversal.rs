//! Hand-off of recursive traversals to an external engine.
//!
//! The coordinator does not walk edges itself. For each request it builds a
//! [`TraversalContext`] (the registry to walk, the caller's session and the view)
//! together with a single-assignment channel, passes the context to a
//! [`TraversalEngine`] and returns the receiving [`TraversalFuture`] at once.
//!
//! The engine completes the context exactly once: [`TraversalContext::complete`]
//! and [`TraversalContext::fail`] consume it, so a context cannot be completed
//! twice or re-armed. There is no timeout or cancellation here; a stalled engine
//! leaves the future pending. Callers that need a bound wrap the future, e.g.
//! with `tokio::time::timeout`.

use crate::registry::PartitionRegistry;
use addrspace_core::{Edge, NodeId, Result, TraversalError, ViewSpec};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

// =============================================================================
// Caller scope
// =============================================================================

/// The session a traversal runs on behalf of.
///
/// Permission evaluation belongs to the engine; the directory only carries the
/// session through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session identifier.
    pub id: u64,
    /// Authenticated principal, if any.
    pub principal: Option<String>,
}

impl Session {
    pub fn new(id: u64) -> Self {
        Self { id, principal: None }
    }

    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }
}

/// What the caller brings to a request.
#[derive(Debug, Clone, Default)]
pub struct AccessScope {
    session: Option<Arc<Session>>,
}

impl AccessScope {
    /// A scope without a session, used for internal requests.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A scope for requests made within `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(Arc::new(session)),
        }
    }

    pub fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }
}

// =============================================================================
// Traversal context
// =============================================================================

/// Everything an engine needs to interpret the address space for one traversal.
pub struct TraversalScope<N> {
    /// Registry the engine walks.
    pub registry: Arc<PartitionRegistry<N>>,
    /// Session of the caller, if any.
    pub session: Option<Arc<Session>>,
    /// View the traversal runs against.
    pub view: ViewSpec,
}

impl<N> fmt::Debug for TraversalScope<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalScope")
            .field("partitions", &self.registry.len())
            .field("session", &self.session)
            .field("view", &self.view)
            .finish()
    }
}

/// One traversal request, owned by the engine until it is completed.
pub struct TraversalContext<N> {
    scope: TraversalScope<N>,
    completer: oneshot::Sender<Result<Vec<Edge>>>,
}

impl<N> TraversalContext<N> {
    /// Creates a context and the future that observes its completion.
    pub fn new(scope: TraversalScope<N>) -> (Self, TraversalFuture) {
        let (completer, receiver) = oneshot::channel();
        (Self { scope, completer }, TraversalFuture::new(receiver))
    }

    pub fn scope(&self) -> &TraversalScope<N> {
        &self.scope
    }

    /// Registry to walk.
    pub fn registry(&self) -> &Arc<PartitionRegistry<N>> {
        &self.scope.registry
    }

    /// Session of the caller, if any.
    pub fn session(&self) -> Option<&Arc<Session>> {
        self.scope.session.as_ref()
    }

    /// View the traversal runs against.
    pub fn view(&self) -> &ViewSpec {
        &self.scope.view
    }

    /// Returns true once the caller has dropped the future.
    ///
    /// Engines may use this to stop early; nothing requires them to.
    pub fn is_abandoned_by_caller(&self) -> bool {
        self.completer.is_closed()
    }

    /// Completes the traversal with the consolidated edge list.
    pub fn complete(self, edges: Vec<Edge>) {
        self.finish(Ok(edges));
    }

    /// Completes the traversal with a fault.
    pub fn fail(self, error: TraversalError) {
        self.finish(Err(error));
    }

    /// Completes the traversal with `result`.
    pub fn finish(self, result: Result<Vec<Edge>>) {
        if self.completer.send(result).is_err() {
            tracing::debug!("Traversal finished after its future was dropped");
        }
    }
}

impl<N> fmt::Debug for TraversalContext<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalContext")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Resolves to the result an engine completed a traversal with.
///
/// If the engine drops the context without completing it, the future resolves
/// to [`TraversalError::Abandoned`]. Once observed, the outcome is kept: later
/// calls to [`try_result`](Self::try_result), polls and [`wait`](Self::wait)
/// all yield the same terminal result.
#[must_use = "the traversal result is only observable through this future"]
#[derive(Debug)]
pub struct TraversalFuture {
    receiver: oneshot::Receiver<Result<Vec<Edge>>>,
    outcome: Option<Result<Vec<Edge>>>,
}

impl TraversalFuture {
    fn new(receiver: oneshot::Receiver<Result<Vec<Edge>>>) -> Self {
        Self {
            receiver,
            outcome: None,
        }
    }

    /// Returns the result if the traversal has already finished.
    pub fn try_result(&mut self) -> Option<Result<Vec<Edge>>> {
        if self.outcome.is_none() {
            self.outcome = match self.receiver.try_recv() {
                Ok(result) => Some(result),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(Err(TraversalError::Abandoned)),
            };
        }
        self.outcome.clone()
    }

    /// Blocks the current thread until the traversal finishes.
    ///
    /// Must not be called from within an async runtime.
    pub fn wait(self) -> Result<Vec<Edge>> {
        match self.outcome {
            Some(outcome) => outcome,
            None => self
                .receiver
                .blocking_recv()
                .unwrap_or(Err(TraversalError::Abandoned)),
        }
    }
}

impl Future for TraversalFuture {
    type Output = Result<Vec<Edge>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = &this.outcome {
            return Poll::Ready(outcome.clone());
        }

        // The receiver must not be polled again once it has yielded
        let outcome = match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(_)) => Err(TraversalError::Abandoned),
            Poll::Pending => return Poll::Pending,
        };
        this.outcome = Some(outcome.clone());
        Poll::Ready(outcome)
    }
}

// =============================================================================
// Engine and coordinator
// =============================================================================

/// Walks edges recursively across partitions.
///
/// `traverse` is called on the requesting thread and should return quickly; an
/// engine doing real work moves the context to its own executor. It must
/// eventually complete the context with the consolidated edges or a fault.
pub trait TraversalEngine<N>: Send + Sync {
    fn traverse(&self, context: TraversalContext<N>, view: ViewSpec, node: NodeId);
}

/// Builds traversal contexts and hands them to the engine.
pub struct TraversalCoordinator<N> {
    registry: Arc<PartitionRegistry<N>>,
    engine: Arc<dyn TraversalEngine<N>>,
}

impl<N> TraversalCoordinator<N> {
    pub fn new(registry: Arc<PartitionRegistry<N>>, engine: Arc<dyn TraversalEngine<N>>) -> Self {
        Self { registry, engine }
    }

    /// Starts a traversal from `node` with the default view.
    pub fn traverse_all(&self, scope: &AccessScope, node: &NodeId) -> TraversalFuture {
        self.traverse_all_with_view(scope, ViewSpec::default(), node)
    }

    /// Starts a traversal from `node` with `view`.
    ///
    /// Returns immediately; the future resolves when the engine completes.
    pub fn traverse_all_with_view(
        &self,
        scope: &AccessScope,
        view: ViewSpec,
        node: &NodeId,
    ) -> TraversalFuture {
        let (context, future) = TraversalContext::new(TraversalScope {
            registry: Arc::clone(&self.registry),
            session: scope.session().cloned(),
            view: view.clone(),
        });

        tracing::debug!(
            node = %node,
            session = ?scope.session().map(|s| s.id),
            default_view = view.is_default(),
            "Handing traversal to engine"
        );
        self.engine.traverse(context, view, *node);

        future
    }
}

impl<N> Clone for TraversalCoordinator<N> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            engine: Arc::clone(&self.engine),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
