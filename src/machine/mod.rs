//! The dispatcher: owns one current state, serializes event application and
//! hands triggered actions to the executor.

pub mod executor;

pub use executor::Action;

use crate::core::{
    Event, EventEnvelope, EventSender, EventSource, Resolver, State, StateHistory, StateTransition,
};
use executor::ActionExecutor;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Environment type of a resolver's actions.
type EnvironmentOf<R> = <<R as Resolver>::Action as Action>::Environment;

/// An event-driven state machine instance.
///
/// Owns exactly one current state, one resolver and one environment.
/// Events submitted through [`send`](Self::send) are applied in submission
/// order, one at a time; the resolved state is stored, published to
/// observers and recorded in history, and each triggered action is spawned
/// concurrently. Every event an action emits re-enters the same ordered
/// queue.
///
/// Created once per logical session; dropping the machine best-effort
/// cancels in-flight actions and stops the event loop. Must be constructed
/// on a tokio runtime.
pub struct StateMachine<R>
where
    R: Resolver,
    R::Action: Action<Event = R::Event>,
{
    sender: EventSender<R::Event>,
    state_rx: watch::Receiver<R::State>,
    history: Arc<Mutex<StateHistory<R::State>>>,
    cancel_root: CancellationToken,
    loop_task: JoinHandle<()>,
}

impl<R> StateMachine<R>
where
    R: Resolver,
    R::Action: Action<Event = R::Event>,
{
    /// Create a machine in `initial_state` and start its event loop.
    pub fn new(resolver: R, initial_state: R::State, environment: Arc<EnvironmentOf<R>>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EventEnvelope<R::Event>>();
        let (state_tx, state_rx) = watch::channel(initial_state.clone());
        let history = Arc::new(Mutex::new(StateHistory::new()));
        let sender = EventSender::new(tx, EventSource::External);
        let executor = ActionExecutor::new(sender.clone(), environment);
        let cancel_root = CancellationToken::new();

        let loop_history = Arc::clone(&history);
        let loop_cancel = cancel_root.clone();
        let loop_task = tokio::spawn(async move {
            let mut current = initial_state;
            // Scope handed to in-flight actions; rotated when a cancellation
            // event is applied so later actions get a fresh scope.
            let mut action_scope = loop_cancel.child_token();

            while let Some(envelope) = rx.recv().await {
                tracing::debug!(
                    event = envelope.event.kind(),
                    source = ?envelope.source,
                    id = %envelope.id,
                    "applying event"
                );

                if envelope.event.is_cancellation() {
                    action_scope.cancel();
                    action_scope = loop_cancel.child_token();
                }

                let resolution = resolver.resolve(&current, &envelope.event);

                // Publish only on full value inequality; an identity
                // resolution is invisible to observers.
                if resolution.new_state != current {
                    tracing::debug!(
                        from = current.name(),
                        to = resolution.new_state.name(),
                        "state transition"
                    );
                    let record = StateTransition {
                        from: current.clone(),
                        to: resolution.new_state.clone(),
                        timestamp: chrono::Utc::now(),
                        event_kind: envelope.event.kind().to_string(),
                    };
                    if let Ok(mut guard) = loop_history.lock() {
                        *guard = guard.record(record);
                    }
                    current = resolution.new_state;
                    let _ = state_tx.send(current.clone());
                }

                for action in resolution.actions {
                    executor.spawn(action, action_scope.clone());
                }
            }
        });

        Self {
            sender,
            state_rx,
            history,
            cancel_root,
            loop_task,
        }
    }

    /// Submit an event. The only write entry point; there is no precondition
    /// on the current state, resolvers degrade unrecognized events to no-ops.
    pub fn send(&self, event: R::Event) {
        self.sender.send(event);
    }

    /// Watch the stream of state changes. The receiver always holds the
    /// latest published state.
    pub fn observe(&self) -> watch::Receiver<R::State> {
        self.state_rx.clone()
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> R::State {
        self.state_rx.borrow().clone()
    }

    /// Snapshot of the transitions applied so far.
    pub fn history(&self) -> StateHistory<R::State> {
        self.history
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl<R> Drop for StateMachine<R>
where
    R: Resolver,
    R::Action: Action<Event = R::Event>,
{
    fn drop(&mut self) {
        self.cancel_root.cancel();
        self.loop_task.abort();
    }
}
