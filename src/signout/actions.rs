//! Actions of the sign-out machine.
//!
//! The remote steps are best effort: a failed global sign-out or token
//! revocation is logged and the run still clears local credentials, so the
//! device never stays signed in because a network call failed. Only a
//! failed local clear is an error.

use super::event::SignOutEvent;
use crate::core::{AuthError, EventSender};
use crate::environment::AuthEnvironment;
use crate::machine::Action;
use crate::types::{CredentialBundle, SignedInData};
use async_trait::async_trait;
use std::sync::Arc;

/// Actions triggered by the sign-out resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum SignOutAction {
    SignOutGlobally(SignedInData),
    RevokeToken(SignedInData),
    /// Overwrite the unified store with an empty bundle.
    ClearLocalCredentials,
}

#[async_trait]
impl Action for SignOutAction {
    type Event = SignOutEvent;
    type Environment = AuthEnvironment;

    fn id(&self) -> &'static str {
        match self {
            Self::SignOutGlobally(_) => "SignOutGlobally",
            Self::RevokeToken(_) => "RevokeToken",
            Self::ClearLocalCredentials => "ClearLocalCredentials",
        }
    }

    async fn execute(
        self,
        dispatcher: EventSender<SignOutEvent>,
        environment: Arc<AuthEnvironment>,
    ) {
        match self {
            Self::SignOutGlobally(data) => {
                if let Err(fault) = environment
                    .provider
                    .global_sign_out(&data.tokens.access_token)
                    .await
                {
                    tracing::warn!(%fault, "global sign-out failed, continuing locally");
                }
                dispatcher.send(SignOutEvent::GlobalSignOutCompleted(data));
            }
            Self::RevokeToken(data) => {
                if let Err(fault) = environment
                    .provider
                    .revoke_token(&data.tokens.refresh_token)
                    .await
                {
                    tracing::warn!(%fault, "token revocation failed, continuing locally");
                }
                dispatcher.send(SignOutEvent::TokenRevoked(data));
            }
            Self::ClearLocalCredentials => {
                match environment.store.save(&CredentialBundle::default()) {
                    Ok(()) => dispatcher.send(SignOutEvent::SignedOutLocally),
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        tracing::warn!(%error, "local credential clear failed");
                        dispatcher.send(SignOutEvent::ThrowError(error));
                    }
                }
            }
        }
    }
}
