//! The closed event union of the sign-in machine.

use crate::core::{AuthError, Event};
use crate::types::{ChallengeData, DeviceMetadata, SignedInData, SrpChallenge};

/// Events understood by the parent sign-in machine. Lifecycle events are
/// matched by the parent resolver before delegation; protocol-step events
/// are wrapped and routed to the owning child.
#[derive(Clone, Debug, PartialEq)]
pub enum SignInEvent {
    /// Start a new sign-in run. Device metadata selects the device-bound
    /// handshake variant.
    InitiateSignIn {
        username: String,
        password: String,
        device_metadata: Option<DeviceMetadata>,
    },
    /// Cooperatively cancel the current run.
    Cancel,
    /// Emitted by the cancel action; advances `Cancelling` to `NotStarted`.
    Cancelled,
    /// Explicit restart out of a terminal state.
    Restart,
    /// Protocol-step event for the SRP child machine.
    Srp(SrpSignInEvent),
    /// Protocol-step event for the device-bound sibling.
    DeviceSrp(DeviceSrpSignInEvent),
}

impl Event for SignInEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::InitiateSignIn { .. } => "InitiateSignIn",
            Self::Cancel => "Cancel",
            Self::Cancelled => "Cancelled",
            Self::Restart => "Restart",
            Self::Srp(event) => event.kind(),
            Self::DeviceSrp(event) => event.kind(),
        }
    }

    fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancel)
    }
}

/// Protocol-step events of the SRP child machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SrpSignInEvent {
    /// The server answered initiate-auth with its challenge.
    ServerChallenge(SrpChallenge),
    /// The password proof was accepted; the handshake is complete.
    Finalize(SignedInData),
    /// The provider requires an additional interactive challenge.
    NextChallenge(ChallengeData),
    /// Computing or submitting the password proof failed.
    ThrowPasswordVerifierError(AuthError),
    /// The initiate step failed.
    ThrowAuthError(AuthError),
}

impl Event for SrpSignInEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::ServerChallenge(_) => "ServerChallenge",
            Self::Finalize(_) => "Finalize",
            Self::NextChallenge(_) => "NextChallenge",
            Self::ThrowPasswordVerifierError(_) => "ThrowPasswordVerifierError",
            Self::ThrowAuthError(_) => "ThrowAuthError",
        }
    }
}

/// Protocol-step events of the device-bound sibling machine.
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceSrpSignInEvent {
    ServerChallenge(SrpChallenge),
    Finalize(SignedInData),
    ThrowDeviceVerifierError(AuthError),
    ThrowAuthError(AuthError),
}

impl Event for DeviceSrpSignInEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::ServerChallenge(_) => "DeviceServerChallenge",
            Self::Finalize(_) => "DeviceFinalize",
            Self::ThrowDeviceVerifierError(_) => "ThrowDeviceVerifierError",
            Self::ThrowAuthError(_) => "ThrowDeviceAuthError",
        }
    }
}
