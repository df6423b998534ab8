//! State transition history tracking.
//!
//! The machine records every state change it applies, together with the kind
//! of the event that caused it. History is immutable: `record` returns a new
//! history with the transition appended.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied state transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from.
    pub from: S,
    /// The state being transitioned to.
    pub to: S,
    /// When the transition was applied.
    pub timestamp: DateTime<Utc>,
    /// Discriminator of the event that caused the transition.
    pub event_kind: String,
}

/// Ordered history of applied transitions for one machine instance.
///
/// # Example
///
/// ```rust
/// use authflow::core::{State, StateHistory, StateTransition};
/// use chrono::Utc;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Phase {
///     NotStarted,
///     InProgress,
/// }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::NotStarted => "NotStarted",
///             Self::InProgress => "InProgress",
///         }
///     }
/// }
///
/// let history = StateHistory::new().record(StateTransition {
///     from: Phase::NotStarted,
///     to: Phase::InProgress,
///     timestamp: Utc::now(),
///     event_kind: "InitiateSignIn".to_string(),
/// });
/// assert_eq!(history.get_path().len(), 2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed: the initial state, then the `to`
    /// state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Total duration from first to last transition, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions in order.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }
}
