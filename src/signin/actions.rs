//! Actions of the sign-in machine: the network and crypto steps of the
//! handshake.

use super::device_srp::DeviceSrpStateData;
use super::event::{DeviceSrpSignInEvent, SignInEvent, SrpSignInEvent};
use super::srp::SrpStateData;
use crate::core::{AuthError, EventSender};
use crate::environment::AuthEnvironment;
use crate::machine::Action;
use crate::types::{ChallengeOutcome, SrpChallenge};
use async_trait::async_trait;
use std::sync::Arc;

/// Actions produced by the parent sign-in resolver. Child actions are
/// wrapped so the parent machine executes one closed action union.
#[derive(Clone, Debug, PartialEq)]
pub enum SignInAction {
    /// Acknowledge a cancel request; completion advances `Cancelling`.
    CancelSignIn,
    Srp(SrpAction),
    DeviceSrp(DeviceSrpAction),
}

/// Actions of the SRP child machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SrpAction {
    /// Start the handshake with the provider.
    InitiateSrpA(SrpStateData),
    /// Compute the password proof and submit it.
    VerifyPasswordSrp {
        state_data: SrpStateData,
        challenge: SrpChallenge,
    },
}

/// Actions of the device-bound sibling.
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceSrpAction {
    InitiateDeviceSrpA(DeviceSrpStateData),
    VerifyDevicePasswordSrp {
        state_data: DeviceSrpStateData,
        challenge: SrpChallenge,
    },
}

#[async_trait]
impl Action for SignInAction {
    type Event = SignInEvent;
    type Environment = AuthEnvironment;

    fn id(&self) -> &'static str {
        match self {
            Self::CancelSignIn => "CancelSignIn",
            Self::Srp(action) => action.id(),
            Self::DeviceSrp(action) => action.id(),
        }
    }

    async fn execute(
        self,
        dispatcher: EventSender<SignInEvent>,
        environment: Arc<AuthEnvironment>,
    ) {
        match self {
            Self::CancelSignIn => dispatcher.send(SignInEvent::Cancelled),
            Self::Srp(action) => action.execute(dispatcher, environment).await,
            Self::DeviceSrp(action) => action.execute(dispatcher, environment).await,
        }
    }
}

impl SrpAction {
    fn id(&self) -> &'static str {
        match self {
            Self::InitiateSrpA(_) => "InitiateSRPA",
            Self::VerifyPasswordSrp { .. } => "VerifyPasswordSRP",
        }
    }

    async fn execute(self, dispatcher: EventSender<SignInEvent>, environment: Arc<AuthEnvironment>) {
        match self {
            Self::InitiateSrpA(state_data) => {
                match environment.provider.initiate_auth(&state_data.username).await {
                    Ok(challenge) => {
                        dispatcher.send(SignInEvent::Srp(SrpSignInEvent::ServerChallenge(
                            challenge,
                        )));
                    }
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        tracing::warn!(%error, "initiate auth failed");
                        dispatcher.send(SignInEvent::Srp(SrpSignInEvent::ThrowAuthError(error)));
                    }
                }
            }
            Self::VerifyPasswordSrp {
                state_data,
                challenge,
            } => {
                let proof = match environment.srp.compute_challenge_response(
                    &state_data.username,
                    &state_data.password,
                    &challenge,
                ) {
                    Ok(proof) => proof,
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        tracing::warn!(%error, "password proof computation failed");
                        dispatcher.send(SignInEvent::Srp(
                            SrpSignInEvent::ThrowPasswordVerifierError(error),
                        ));
                        return;
                    }
                };
                // The server may report a canonical username differing from
                // the submitted one.
                let username = challenge
                    .username
                    .as_deref()
                    .unwrap_or(&state_data.username);
                match environment.provider.verify_challenge(username, &proof).await {
                    Ok(ChallengeOutcome::SignedIn(data)) => {
                        dispatcher.send(SignInEvent::Srp(SrpSignInEvent::Finalize(data)));
                    }
                    Ok(ChallengeOutcome::NextChallenge(data)) => {
                        dispatcher.send(SignInEvent::Srp(SrpSignInEvent::NextChallenge(data)));
                    }
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        tracing::warn!(%error, "password verification failed");
                        dispatcher.send(SignInEvent::Srp(
                            SrpSignInEvent::ThrowPasswordVerifierError(error),
                        ));
                    }
                }
            }
        }
    }
}

impl DeviceSrpAction {
    fn id(&self) -> &'static str {
        match self {
            Self::InitiateDeviceSrpA(_) => "InitiateDeviceSRPA",
            Self::VerifyDevicePasswordSrp { .. } => "VerifyDevicePasswordSRP",
        }
    }

    async fn execute(self, dispatcher: EventSender<SignInEvent>, environment: Arc<AuthEnvironment>) {
        match self {
            Self::InitiateDeviceSrpA(state_data) => {
                match environment
                    .provider
                    .initiate_device_auth(&state_data.username, &state_data.device_metadata)
                    .await
                {
                    Ok(challenge) => {
                        dispatcher.send(SignInEvent::DeviceSrp(
                            DeviceSrpSignInEvent::ServerChallenge(challenge),
                        ));
                    }
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        tracing::warn!(%error, "initiate device auth failed");
                        dispatcher.send(SignInEvent::DeviceSrp(
                            DeviceSrpSignInEvent::ThrowAuthError(error),
                        ));
                    }
                }
            }
            Self::VerifyDevicePasswordSrp {
                state_data,
                challenge,
            } => {
                let proof = match environment.srp.compute_challenge_response(
                    &state_data.username,
                    &state_data.password,
                    &challenge,
                ) {
                    Ok(proof) => proof,
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        dispatcher.send(SignInEvent::DeviceSrp(
                            DeviceSrpSignInEvent::ThrowDeviceVerifierError(error),
                        ));
                        return;
                    }
                };
                let username = challenge
                    .username
                    .as_deref()
                    .unwrap_or(&state_data.username);
                match environment
                    .provider
                    .verify_device_challenge(username, &state_data.device_metadata, &proof)
                    .await
                {
                    Ok(ChallengeOutcome::SignedIn(data)) => {
                        dispatcher.send(SignInEvent::DeviceSrp(DeviceSrpSignInEvent::Finalize(
                            data,
                        )));
                    }
                    Ok(ChallengeOutcome::NextChallenge(_)) => {
                        // The device flow completes in one verification round.
                        dispatcher.send(SignInEvent::DeviceSrp(
                            DeviceSrpSignInEvent::ThrowDeviceVerifierError(AuthError::Service(
                                "unexpected additional challenge during device auth".into(),
                            )),
                        ));
                    }
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        dispatcher.send(SignInEvent::DeviceSrp(
                            DeviceSrpSignInEvent::ThrowDeviceVerifierError(error),
                        ));
                    }
                }
            }
        }
    }
}
