//! Events and the dispatcher handle used to submit them.
//!
//! An event is an immutable message describing something that happened.
//! Events are produced by external callers and by actions; both paths go
//! through the same ordered queue of a machine instance.

use chrono::{DateTime, Utc};
use std::fmt::Debug;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Trait for state machine events.
///
/// Each machine level owns a closed tagged union of event kinds; composite
/// resolvers delegate wrapped child events with an exhaustive match, so an
/// unhandled case is a compile-time error rather than a runtime cast.
pub trait Event: Clone + Debug + Send + Sync + 'static {
    /// Stable discriminator for logging.
    fn kind(&self) -> &'static str;

    /// Whether this event requests cooperative cancellation of in-flight
    /// actions. The machine cancels and rotates its action token before the
    /// event reaches the resolver.
    ///
    /// Default implementation returns `false`.
    fn is_cancellation(&self) -> bool {
        false
    }
}

/// Where an event originated.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventSource {
    /// Submitted by an external caller through [`StateMachine::send`].
    ///
    /// [`StateMachine::send`]: crate::machine::StateMachine::send
    External,
    /// Emitted by the named action on completion.
    Action(&'static str),
}

/// An event wrapped with delivery metadata as it enters the queue.
#[derive(Clone, Debug)]
pub struct EventEnvelope<E> {
    /// Unique id of this submission.
    pub id: Uuid,
    /// Who submitted the event.
    pub source: EventSource,
    /// When the event entered the queue.
    pub occurred_at: DateTime<Utc>,
    /// The event payload handed to the resolver.
    pub event: E,
}

impl<E: Event> EventEnvelope<E> {
    pub(crate) fn new(event: E, source: EventSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            occurred_at: Utc::now(),
            event,
        }
    }
}

/// Handle for submitting events into a machine's ordered queue.
///
/// Actions receive a sender tagged with their identifier so every completion
/// event records which action produced it. Sending to a machine that has
/// been dropped is a silent no-op; a completion for a dead machine carries
/// no information anyone can act on.
#[derive(Clone)]
pub struct EventSender<E: Event> {
    tx: mpsc::UnboundedSender<EventEnvelope<E>>,
    source: EventSource,
}

impl<E: Event> EventSender<E> {
    pub(crate) fn new(tx: mpsc::UnboundedSender<EventEnvelope<E>>, source: EventSource) -> Self {
        Self { tx, source }
    }

    /// Submit an event. Events re-enter the machine's queue in submission
    /// order regardless of which task sends them.
    pub fn send(&self, event: E) {
        let kind = event.kind();
        let envelope = EventEnvelope::new(event, self.source.clone());
        if self.tx.send(envelope).is_err() {
            tracing::debug!(event = kind, "machine dropped; event discarded");
        }
    }

    /// Re-tag this sender for an action's completion events.
    pub(crate) fn for_action(&self, id: &'static str) -> Self {
        Self {
            tx: self.tx.clone(),
            source: EventSource::Action(id),
        }
    }
}
