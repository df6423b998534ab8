//! State resolution: the pure core of every machine.

use super::event::Event;
use super::state::State;

/// Result of applying one event to one state: the next state plus the
/// actions the transition triggered.
#[derive(Clone, PartialEq, Debug)]
pub struct StateResolution<S, A> {
    /// The state after applying the event.
    pub new_state: S,
    /// Side-effecting work triggered by the transition; executed at most once.
    pub actions: Vec<A>,
}

impl<S, A> StateResolution<S, A> {
    /// Identity resolution: the event is not recognized, nothing changes and
    /// no actions are produced.
    pub fn stay(state: S) -> Self {
        Self {
            new_state: state,
            actions: Vec::new(),
        }
    }

    /// Transition without side effects.
    pub fn transition(new_state: S) -> Self {
        Self {
            new_state,
            actions: Vec::new(),
        }
    }

    /// Transition accompanied by actions.
    pub fn with_actions(new_state: S, actions: Vec<A>) -> Self {
        Self { new_state, actions }
    }
}

/// A stateless, pure, total function translating `(old_state, event)` into a
/// [`StateResolution`].
///
/// For a given concrete state type the resolver is the single authority over
/// transitions. Guarantees:
///
/// - deterministic and referentially transparent: same inputs always produce
///   the same resolution
/// - total: never panics; failure paths resolve into an explicit error state
/// - unrecognized events resolve to [`StateResolution::stay`]
///
/// A resolver for a composite state delegates wrapped child events to its
/// child resolvers and reconstructs the composite losslessly: only the
/// delegated-to child slot changes.
pub trait Resolver: Send + Sync + 'static {
    /// The state type this resolver owns.
    type State: State;
    /// The closed event union this resolver understands.
    type Event: Event;
    /// The action type produced by transitions.
    type Action;

    /// Compute the next state and triggered actions. Pure; suspension only
    /// ever happens inside actions, never here.
    fn resolve(
        &self,
        old_state: &Self::State,
        event: &Self::Event,
    ) -> StateResolution<Self::State, Self::Action>;
}
