//! The SRP child machine: challenge-response handshake without device
//! metadata.

use super::actions::SrpAction;
use super::event::SrpSignInEvent;
use crate::core::{AuthError, Resolver, State, StateResolution};
use crate::types::{ChallengeData, SignedInData};
use serde::{Deserialize, Serialize};

/// Data captured at initiate time and threaded through the handshake.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SrpStateData {
    pub username: String,
    pub password: String,
}

/// Phases of the SRP handshake.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SrpSignInState {
    InitiatingSrpA(SrpStateData),
    RespondingPasswordVerifier(SrpStateData),
    NextAuthChallenge(ChallengeData),
    SignedIn(SignedInData),
    Error(AuthError),
}

impl State for SrpSignInState {
    fn name(&self) -> &str {
        match self {
            Self::InitiatingSrpA(_) => "InitiatingSRPA",
            Self::RespondingPasswordVerifier(_) => "RespondingPasswordVerifier",
            Self::NextAuthChallenge(_) => "NextAuthChallenge",
            Self::SignedIn(_) => "SignedIn",
            Self::Error(_) => "Error",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::SignedIn(_) | Self::Error(_))
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Resolver for the SRP child machine.
pub struct SrpSignInResolver;

impl Resolver for SrpSignInResolver {
    type State = SrpSignInState;
    type Event = SrpSignInEvent;
    type Action = SrpAction;

    fn resolve(
        &self,
        old_state: &SrpSignInState,
        event: &SrpSignInEvent,
    ) -> StateResolution<SrpSignInState, SrpAction> {
        match (old_state, event) {
            (SrpSignInState::InitiatingSrpA(data), SrpSignInEvent::ServerChallenge(challenge)) => {
                StateResolution::with_actions(
                    SrpSignInState::RespondingPasswordVerifier(data.clone()),
                    vec![SrpAction::VerifyPasswordSrp {
                        state_data: data.clone(),
                        challenge: challenge.clone(),
                    }],
                )
            }
            (SrpSignInState::RespondingPasswordVerifier(_), SrpSignInEvent::Finalize(data)) => {
                StateResolution::transition(SrpSignInState::SignedIn(data.clone()))
            }
            (
                SrpSignInState::RespondingPasswordVerifier(_),
                SrpSignInEvent::NextChallenge(challenge),
            ) => StateResolution::transition(SrpSignInState::NextAuthChallenge(challenge.clone())),
            // The additional challenge is answered outside this core; a
            // finalize completes the run once it has been.
            (SrpSignInState::NextAuthChallenge(_), SrpSignInEvent::Finalize(data)) => {
                StateResolution::transition(SrpSignInState::SignedIn(data.clone()))
            }
            (
                state,
                SrpSignInEvent::ThrowPasswordVerifierError(error)
                | SrpSignInEvent::ThrowAuthError(error),
            ) if !state.is_final() => {
                StateResolution::transition(SrpSignInState::Error(error.clone()))
            }
            (state, _) => StateResolution::stay(state.clone()),
        }
    }
}
