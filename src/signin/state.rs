//! Parent sign-in state: a sum type over handshake phases.

use super::device_srp::DeviceSrpSignInState;
use super::srp::SrpSignInState;
use crate::core::{AuthError, State};
use crate::types::SignedInData;
use serde::{Deserialize, Serialize};

/// Phases of a sign-in run.
///
/// The two `SigningInWith*` variants hold the child machine selected by the
/// parent resolver; child `SignedIn`/`Error` results are lifted into the
/// parent terminals.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SignInState {
    NotStarted,
    SigningInWithSrp(SrpSignInState),
    SigningInWithDeviceSrp(DeviceSrpSignInState),
    SignedIn(SignedInData),
    Cancelling,
    Error(AuthError),
}

impl State for SignInState {
    fn name(&self) -> &str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::SigningInWithSrp(_) => "SigningInWithSRP",
            Self::SigningInWithDeviceSrp(_) => "SigningInWithDeviceSRP",
            Self::SignedIn(_) => "SignedIn",
            Self::Cancelling => "Cancelling",
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
