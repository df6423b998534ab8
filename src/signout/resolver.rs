//! Resolver of the sign-out machine.
//!
//! A linear run: optional global sign-out, then token revocation, then the
//! local store clear. The guest path jumps straight to the local clear.

use super::actions::SignOutAction;
use super::event::SignOutEvent;
use super::state::SignOutState;
use crate::core::{Resolver, State, StateResolution};

/// Resolver for the sign-out machine.
pub struct SignOutResolver;

impl Resolver for SignOutResolver {
    type State = SignOutState;
    type Event = SignOutEvent;
    type Action = SignOutAction;

    fn resolve(
        &self,
        old_state: &SignOutState,
        event: &SignOutEvent,
    ) -> StateResolution<SignOutState, SignOutAction> {
        match (old_state, event) {
            (
                SignOutState::NotStarted,
                SignOutEvent::InitiateSignOut {
                    signed_in_data,
                    global_sign_out,
                },
            ) => match (signed_in_data, global_sign_out) {
                (None, _) => StateResolution::with_actions(
                    SignOutState::SigningOutLocally(None),
                    vec![SignOutAction::ClearLocalCredentials],
                ),
                (Some(data), true) => StateResolution::with_actions(
                    SignOutState::SigningOutGlobally(data.clone()),
                    vec![SignOutAction::SignOutGlobally(data.clone())],
                ),
                (Some(data), false) => StateResolution::with_actions(
                    SignOutState::RevokingToken(data.clone()),
                    vec![SignOutAction::RevokeToken(data.clone())],
                ),
            },
            (
                SignOutState::SigningOutGlobally(_),
                SignOutEvent::GlobalSignOutCompleted(data),
            ) => StateResolution::with_actions(
                SignOutState::RevokingToken(data.clone()),
                vec![SignOutAction::RevokeToken(data.clone())],
            ),
            (SignOutState::RevokingToken(_), SignOutEvent::TokenRevoked(data)) => {
                StateResolution::with_actions(
                    SignOutState::SigningOutLocally(Some(data.clone())),
                    vec![SignOutAction::ClearLocalCredentials],
                )
            }
            (SignOutState::SigningOutLocally(data), SignOutEvent::SignedOutLocally) => {
                StateResolution::transition(SignOutState::SignedOut {
                    username: data.as_ref().map(|data| data.username.clone()),
                })
            }
            (state, SignOutEvent::ThrowError(error)) if !state.is_final() => {
                StateResolution::transition(SignOutState::Error(error.clone()))
            }
            (state, _) => StateResolution::stay(state.clone()),
        }
    }
}
