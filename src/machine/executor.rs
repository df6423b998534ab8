//! Action execution, decoupled from event application.
//!
//! Actions are spawned as independent tasks and may run concurrently with
//! each other and with further event processing. Every event they emit
//! re-enters the owning machine's ordered queue.

use crate::core::{Event, EventSender};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A named unit of side-effecting work triggered by a transition.
///
/// An action performs at most one externally observable effect (one network
/// operation, one store read, or one store write) and on completion emits
/// exactly one follow-up event describing success or failure. Actions never
/// mutate state directly; state changes only happen through emitted events.
#[async_trait]
pub trait Action: Send + Sized + 'static {
    /// The event union of the machine this action belongs to.
    type Event: Event;
    /// The capability bag this action executes against.
    type Environment: Send + Sync + 'static;

    /// Stable identifier, used as the source tag of emitted events.
    fn id(&self) -> &'static str;

    /// Perform the work. The payload was captured when the resolver created
    /// the action; the environment is read-only.
    async fn execute(
        self,
        dispatcher: EventSender<Self::Event>,
        environment: Arc<Self::Environment>,
    );
}

/// Spawns actions and races them against the machine's cancellation scope.
pub(crate) struct ActionExecutor<A: Action> {
    sender: EventSender<A::Event>,
    environment: Arc<A::Environment>,
}

impl<A: Action> ActionExecutor<A> {
    pub(crate) fn new(sender: EventSender<A::Event>, environment: Arc<A::Environment>) -> Self {
        Self {
            sender,
            environment,
        }
    }

    /// Spawn one action. Cancellation is cooperative: a cancelled action has
    /// its completion event suppressed rather than emitting a partial one,
    /// and the underlying I/O is not guaranteed to be aborted mid-flight.
    pub(crate) fn spawn(&self, action: A, cancel: CancellationToken) {
        let id = action.id();
        let dispatcher = self.sender.for_action(id);
        let environment = Arc::clone(&self.environment);
        tokio::spawn(async move {
            tracing::debug!(action = id, "executing action");
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!(action = id, "action cancelled before completion");
                }
                () = action.execute(dispatcher, environment) => {}
            }
        });
    }
}
