//! States of the sign-out machine.

use crate::core::{AuthError, State};
use crate::types::SignedInData;
use serde::{Deserialize, Serialize};

/// Phases of a sign-out run.
///
/// Global sign-out and token revocation run first when requested; the local
/// store clear always runs last, so a user never keeps local credentials
/// after the remote side was told to forget them.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SignOutState {
    NotStarted,
    SigningOutGlobally(SignedInData),
    RevokingToken(SignedInData),
    /// `None` for the guest path, where there is no signed-in user to revoke.
    SigningOutLocally(Option<SignedInData>),
    SignedOut { username: Option<String> },
    Error(AuthError),
}

impl State for SignOutState {
    fn name(&self) -> &str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::SigningOutGlobally(_) => "SigningOutGlobally",
            Self::RevokingToken(_) => "RevokingToken",
            Self::SigningOutLocally(_) => "SigningOutLocally",
            Self::SignedOut { .. } => "SignedOut",
            Self::Error(_) => "Error",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::SignedOut { .. } | Self::Error(_))
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
