//! Resolver of the credential-session pipeline.
//!
//! A linear fetch pipeline: load the cached bundle, resolve an identity,
//! exchange it for scoped credentials, persist the result. Stages with a
//! cached result are skipped; each stage's completion event replaces
//! exactly one field of the carried [`SessionData`].

use super::actions::SessionAction;
use super::event::SessionEvent;
use super::state::{SessionData, SessionState, TokenResult};
use crate::core::{AuthError, Resolver, StateResolution};
use crate::types::{CredentialBundle, Session};

/// Resolver for the session machine.
pub struct SessionResolver;

impl SessionResolver {
    fn resolve_cancel(
        &self,
        old_state: &SessionState,
    ) -> StateResolution<SessionState, SessionAction> {
        match old_state {
            SessionState::MigratingLegacyStore
            | SessionState::FetchingUserPoolTokens(_)
            | SessionState::FetchingIdentity(_)
            | SessionState::FetchingAwsCredentials(_) => StateResolution::with_actions(
                SessionState::Cancelling,
                vec![SessionAction::CancelFetch],
            ),
            SessionState::Cancelling => StateResolution::transition(SessionState::Uninitialized),
            state => StateResolution::stay(state.clone()),
        }
    }

    /// Route a freshly loaded bundle to the first stage whose result is
    /// still missing.
    fn resolve_cached(
        &self,
        bundle: Option<&CredentialBundle>,
    ) -> StateResolution<SessionState, SessionAction> {
        let data = match bundle {
            Some(bundle) => SessionData::from_bundle(bundle),
            None => SessionData::empty().with_tokens(TokenResult::SignedOut),
        };

        match (&data.identity_id, &data.credentials) {
            (Some(identity_id), Some(credentials)) => {
                // Everything cached and still valid; no fetch needed.
                StateResolution::transition(SessionState::Established(Session {
                    identity_id: identity_id.clone(),
                    credentials: credentials.clone(),
                    tokens: data.tokens.tokens().cloned(),
                }))
            }
            (Some(identity_id), None) => StateResolution::with_actions(
                SessionState::FetchingAwsCredentials(data.clone()),
                vec![SessionAction::FetchAwsCredentials {
                    identity_id: identity_id.clone(),
                    tokens: data.tokens.tokens().cloned(),
                }],
            ),
            (None, _) => StateResolution::with_actions(
                SessionState::FetchingIdentity(data.clone()),
                vec![SessionAction::FetchIdentity {
                    tokens: data.tokens.tokens().cloned(),
                }],
            ),
        }
    }
}

impl Resolver for SessionResolver {
    type State = SessionState;
    type Event = SessionEvent;
    type Action = SessionAction;

    fn resolve(
        &self,
        old_state: &SessionState,
        event: &SessionEvent,
    ) -> StateResolution<SessionState, SessionAction> {
        if let SessionEvent::Cancel = event {
            return self.resolve_cancel(old_state);
        }

        match (old_state, event) {
            // Any completion arriving while cancelling finishes the cancel.
            (SessionState::Cancelling, _) => {
                StateResolution::transition(SessionState::Uninitialized)
            }
            (SessionState::Uninitialized, SessionEvent::MigrateLegacyStore) => {
                StateResolution::with_actions(
                    SessionState::MigratingLegacyStore,
                    vec![SessionAction::MigrateLegacyCredentials],
                )
            }
            (SessionState::MigratingLegacyStore, SessionEvent::MigrationCompleted) => {
                StateResolution::transition(SessionState::Uninitialized)
            }
            (SessionState::Uninitialized | SessionState::Error(_), SessionEvent::Initialize) => {
                StateResolution::with_actions(
                    SessionState::FetchingUserPoolTokens(SessionData::empty()),
                    vec![SessionAction::InitializeFetchSession],
                )
            }
            (
                SessionState::FetchingUserPoolTokens(_),
                SessionEvent::CachedCredentialsFetched(bundle),
            ) => self.resolve_cached(bundle.as_ref()),
            (SessionState::FetchingIdentity(data), SessionEvent::IdentityFetched(identity_id)) => {
                let data = data.with_identity_id(Some(identity_id.clone()));
                StateResolution::with_actions(
                    SessionState::FetchingAwsCredentials(data.clone()),
                    vec![SessionAction::FetchAwsCredentials {
                        identity_id: identity_id.clone(),
                        tokens: data.tokens.tokens().cloned(),
                    }],
                )
            }
            (
                SessionState::FetchingAwsCredentials(data),
                SessionEvent::AwsCredentialsFetched(credentials),
            ) => match &data.identity_id {
                Some(identity_id) => {
                    let session = Session {
                        identity_id: identity_id.clone(),
                        credentials: credentials.clone(),
                        tokens: data.tokens.tokens().cloned(),
                    };
                    let bundle = CredentialBundle {
                        identity_id: Some(identity_id.clone()),
                        tokens: data.tokens.tokens().cloned(),
                        credentials: Some(credentials.clone()),
                    };
                    StateResolution::with_actions(
                        SessionState::Established(session),
                        vec![SessionAction::PersistSession(bundle)],
                    )
                }
                None => StateResolution::transition(SessionState::Error(AuthError::Service(
                    "credentials resolved without an identity".into(),
                ))),
            },
            (SessionState::Established(session), SessionEvent::Refresh) => {
                let tokens = match &session.tokens {
                    Some(tokens) => TokenResult::Fetched(tokens.clone()),
                    None => TokenResult::SignedOut,
                };
                let data = SessionData::empty().with_tokens(tokens);
                StateResolution::with_actions(
                    SessionState::FetchingIdentity(data.clone()),
                    vec![SessionAction::FetchIdentity {
                        tokens: data.tokens.tokens().cloned(),
                    }],
                )
            }
            (
                SessionState::MigratingLegacyStore
                | SessionState::FetchingUserPoolTokens(_)
                | SessionState::FetchingIdentity(_)
                | SessionState::FetchingAwsCredentials(_),
                SessionEvent::ThrowError(error),
            ) => StateResolution::transition(SessionState::Error(error.clone())),
            (state, _) => StateResolution::stay(state.clone()),
        }
    }
}
