//! Device-bound sibling of the SRP child machine.
//!
//! Mirrors the SRP handshake shape but threads device metadata through
//! every state; selected by the parent resolver when the initiate event
//! carries device metadata.

use super::actions::DeviceSrpAction;
use super::event::DeviceSrpSignInEvent;
use crate::core::{AuthError, Resolver, State, StateResolution};
use crate::types::{DeviceMetadata, SignedInData};
use serde::{Deserialize, Serialize};

/// Data captured at initiate time, including the remembered device.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DeviceSrpStateData {
    pub username: String,
    pub password: String,
    pub device_metadata: DeviceMetadata,
}

/// Phases of the device-bound handshake.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum DeviceSrpSignInState {
    InitiatingDeviceSrpA(DeviceSrpStateData),
    RespondingDevicePasswordVerifier(DeviceSrpStateData),
    SignedIn(SignedInData),
    Error(AuthError),
}

impl State for DeviceSrpSignInState {
    fn name(&self) -> &str {
        match self {
            Self::InitiatingDeviceSrpA(_) => "InitiatingDeviceSRPA",
            Self::RespondingDevicePasswordVerifier(_) => "RespondingDevicePasswordVerifier",
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

/// Resolver for the device-bound sibling.
pub struct DeviceSrpSignInResolver;

impl Resolver for DeviceSrpSignInResolver {
    type State = DeviceSrpSignInState;
    type Event = DeviceSrpSignInEvent;
    type Action = DeviceSrpAction;

    fn resolve(
        &self,
        old_state: &DeviceSrpSignInState,
        event: &DeviceSrpSignInEvent,
    ) -> StateResolution<DeviceSrpSignInState, DeviceSrpAction> {
        match (old_state, event) {
            (
                DeviceSrpSignInState::InitiatingDeviceSrpA(data),
                DeviceSrpSignInEvent::ServerChallenge(challenge),
            ) => StateResolution::with_actions(
                DeviceSrpSignInState::RespondingDevicePasswordVerifier(data.clone()),
                vec![DeviceSrpAction::VerifyDevicePasswordSrp {
                    state_data: data.clone(),
                    challenge: challenge.clone(),
                }],
            ),
            (
                DeviceSrpSignInState::RespondingDevicePasswordVerifier(_),
                DeviceSrpSignInEvent::Finalize(data),
            ) => StateResolution::transition(DeviceSrpSignInState::SignedIn(data.clone())),
            (
                state,
                DeviceSrpSignInEvent::ThrowDeviceVerifierError(error)
                | DeviceSrpSignInEvent::ThrowAuthError(error),
            ) if !state.is_final() => {
                StateResolution::transition(DeviceSrpSignInState::Error(error.clone()))
            }
            (state, _) => StateResolution::stay(state.clone()),
        }
    }
}
