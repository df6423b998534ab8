//! Parent resolver of the sign-in machine.
//!
//! Lifecycle events (cancel, restart) are handled here before any
//! delegation; protocol-step events are routed to the child resolver
//! owned by the current state, and child terminals are lifted into
//! parent terminals.

use super::actions::SignInAction;
use super::device_srp::{
    DeviceSrpSignInResolver, DeviceSrpSignInState, DeviceSrpStateData,
};
use super::event::SignInEvent;
use super::srp::{SrpSignInResolver, SrpSignInState, SrpStateData};
use super::state::SignInState;
use crate::core::{AuthError, Resolver, State, StateResolution};
use crate::signin::actions::{DeviceSrpAction, SrpAction};

/// Resolver for the composite sign-in machine.
pub struct SignInResolver {
    srp: SrpSignInResolver,
    device_srp: DeviceSrpSignInResolver,
}

impl SignInResolver {
    pub fn new() -> Self {
        Self {
            srp: SrpSignInResolver,
            device_srp: DeviceSrpSignInResolver,
        }
    }

    fn resolve_cancel(
        &self,
        old_state: &SignInState,
    ) -> StateResolution<SignInState, SignInAction> {
        match old_state {
            // Nothing in flight; terminals only exit via restart.
            SignInState::NotStarted | SignInState::SignedIn(_) | SignInState::Error(_) => {
                StateResolution::stay(old_state.clone())
            }
            SignInState::Cancelling => StateResolution::transition(SignInState::NotStarted),
            _ => StateResolution::with_actions(
                SignInState::Cancelling,
                vec![SignInAction::CancelSignIn],
            ),
        }
    }

    fn lift_srp(
        &self,
        resolution: StateResolution<SrpSignInState, SrpAction>,
    ) -> StateResolution<SignInState, SignInAction> {
        let actions = resolution
            .actions
            .into_iter()
            .map(SignInAction::Srp)
            .collect();
        let new_state = match resolution.new_state {
            SrpSignInState::SignedIn(data) => SignInState::SignedIn(data),
            SrpSignInState::Error(error) => SignInState::Error(error),
            other => SignInState::SigningInWithSrp(other),
        };
        StateResolution { new_state, actions }
    }

    fn lift_device_srp(
        &self,
        resolution: StateResolution<DeviceSrpSignInState, DeviceSrpAction>,
    ) -> StateResolution<SignInState, SignInAction> {
        let actions = resolution
            .actions
            .into_iter()
            .map(SignInAction::DeviceSrp)
            .collect();
        let new_state = match resolution.new_state {
            DeviceSrpSignInState::SignedIn(data) => SignInState::SignedIn(data),
            DeviceSrpSignInState::Error(error) => SignInState::Error(error),
            other => SignInState::SigningInWithDeviceSrp(other),
        };
        StateResolution { new_state, actions }
    }
}

impl Default for SignInResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for SignInResolver {
    type State = SignInState;
    type Event = SignInEvent;
    type Action = SignInAction;

    fn resolve(
        &self,
        old_state: &SignInState,
        event: &SignInEvent,
    ) -> StateResolution<SignInState, SignInAction> {
        match event {
            SignInEvent::Cancel => return self.resolve_cancel(old_state),
            SignInEvent::Restart if old_state.is_final() => {
                return StateResolution::transition(SignInState::NotStarted);
            }
            _ => {}
        }

        match (old_state, event) {
            // Any completion arriving while cancelling finishes the cancel.
            (SignInState::Cancelling, _) => StateResolution::transition(SignInState::NotStarted),
            (
                SignInState::NotStarted,
                SignInEvent::InitiateSignIn {
                    username,
                    password,
                    device_metadata,
                },
            ) => {
                if username.trim().is_empty() {
                    return StateResolution::transition(SignInState::Error(
                        AuthError::Validation("username must not be empty".into()),
                    ));
                }
                match device_metadata {
                    Some(metadata) => {
                        let data = DeviceSrpStateData {
                            username: username.clone(),
                            password: password.clone(),
                            device_metadata: metadata.clone(),
                        };
                        StateResolution::with_actions(
                            SignInState::SigningInWithDeviceSrp(
                                DeviceSrpSignInState::InitiatingDeviceSrpA(data.clone()),
                            ),
                            vec![SignInAction::DeviceSrp(
                                DeviceSrpAction::InitiateDeviceSrpA(data),
                            )],
                        )
                    }
                    None => {
                        let data = SrpStateData {
                            username: username.clone(),
                            password: password.clone(),
                        };
                        StateResolution::with_actions(
                            SignInState::SigningInWithSrp(SrpSignInState::InitiatingSrpA(
                                data.clone(),
                            )),
                            vec![SignInAction::Srp(SrpAction::InitiateSrpA(data))],
                        )
                    }
                }
            }
            (SignInState::SigningInWithSrp(child), SignInEvent::Srp(child_event)) => {
                self.lift_srp(self.srp.resolve(child, child_event))
            }
            (SignInState::SigningInWithDeviceSrp(child), SignInEvent::DeviceSrp(child_event)) => {
                self.lift_device_srp(self.device_srp.resolve(child, child_event))
            }
            (state, _) => StateResolution::stay(state.clone()),
        }
    }
}
