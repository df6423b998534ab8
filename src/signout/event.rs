//! The closed event union of the sign-out machine.

use crate::core::{AuthError, Event};
use crate::types::SignedInData;

/// Events understood by the sign-out machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SignOutEvent {
    /// Start a sign-out run. `None` signed-in data takes the guest path
    /// (local clear only); `global_sign_out` additionally invalidates
    /// tokens on every device before revoking.
    InitiateSignOut {
        signed_in_data: Option<SignedInData>,
        global_sign_out: bool,
    },
    /// The global sign-out call finished (best effort).
    GlobalSignOutCompleted(SignedInData),
    /// The refresh token revocation finished (best effort).
    TokenRevoked(SignedInData),
    /// The local credential store was cleared.
    SignedOutLocally,
    ThrowError(AuthError),
}

impl Event for SignOutEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::InitiateSignOut { .. } => "InitiateSignOut",
            Self::GlobalSignOutCompleted(_) => "GlobalSignOutCompleted",
            Self::TokenRevoked(_) => "TokenRevoked",
            Self::SignedOutLocally => "SignedOutLocally",
            Self::ThrowError(_) => "ThrowError",
        }
    }
}
