//! Actions of the session pipeline: store and network stages.

use super::event::SessionEvent;
use super::migration;
use crate::core::{AuthError, EventSender};
use crate::environment::AuthEnvironment;
use crate::machine::Action;
use crate::types::{CredentialBundle, IdentityId, UserPoolTokens};
use async_trait::async_trait;
use std::sync::Arc;

/// Actions triggered by the session resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// One-time fold of the legacy store layout into the unified bundle.
    MigrateLegacyCredentials,
    /// Load the cached bundle, dropping expired entries.
    InitializeFetchSession,
    FetchIdentity {
        tokens: Option<UserPoolTokens>,
    },
    FetchAwsCredentials {
        identity_id: IdentityId,
        tokens: Option<UserPoolTokens>,
    },
    /// Write the established session back to the store.
    PersistSession(CredentialBundle),
    /// Acknowledge a cancel request; completion advances `Cancelling`.
    CancelFetch,
}

#[async_trait]
impl Action for SessionAction {
    type Event = SessionEvent;
    type Environment = AuthEnvironment;

    fn id(&self) -> &'static str {
        match self {
            Self::MigrateLegacyCredentials => "MigrateLegacyCredentials",
            Self::InitializeFetchSession => "InitializeFetchSession",
            Self::FetchIdentity { .. } => "FetchIdentity",
            Self::FetchAwsCredentials { .. } => "FetchAWSCredentials",
            Self::PersistSession(_) => "PersistSession",
            Self::CancelFetch => "CancelFetch",
        }
    }

    async fn execute(
        self,
        dispatcher: EventSender<SessionEvent>,
        environment: Arc<AuthEnvironment>,
    ) {
        match self {
            Self::MigrateLegacyCredentials => migration::run(&dispatcher, &environment),
            Self::InitializeFetchSession => {
                let mut bundle = match environment.store.load() {
                    Ok(bundle) => bundle,
                    Err(fault) => {
                        // An unreadable cache degrades to a cold fetch.
                        tracing::warn!(%fault, "credential store unreadable, fetching fresh");
                        None
                    }
                };
                if let Some(cached) = bundle.as_mut() {
                    let now = environment.clock.now();
                    if cached
                        .tokens
                        .as_ref()
                        .is_some_and(|tokens| tokens.is_expired(now))
                    {
                        cached.tokens = None;
                    }
                    if cached
                        .credentials
                        .as_ref()
                        .is_some_and(|credentials| credentials.is_expired(now))
                    {
                        cached.credentials = None;
                    }
                    if cached.is_empty() {
                        bundle = None;
                    }
                }
                dispatcher.send(SessionEvent::CachedCredentialsFetched(bundle));
            }
            Self::FetchIdentity { tokens } => {
                let logins = environment.logins_for(tokens.as_ref());
                match environment.identity.resolve_identity(&logins).await {
                    Ok(identity_id) => {
                        dispatcher.send(SessionEvent::IdentityFetched(identity_id));
                    }
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        tracing::warn!(%error, "identity resolution failed");
                        dispatcher.send(SessionEvent::ThrowError(error));
                    }
                }
            }
            Self::FetchAwsCredentials {
                identity_id,
                tokens,
            } => {
                let logins = environment.logins_for(tokens.as_ref());
                match environment
                    .identity
                    .exchange_for_credentials(&identity_id, &logins)
                    .await
                {
                    Ok(credentials) => {
                        dispatcher.send(SessionEvent::AwsCredentialsFetched(credentials));
                    }
                    Err(fault) => {
                        let error = AuthError::classify(fault);
                        tracing::warn!(%error, "credential exchange failed");
                        dispatcher.send(SessionEvent::ThrowError(error));
                    }
                }
            }
            Self::PersistSession(bundle) => {
                // The session is already established; a failed write only
                // costs the next cold start a refetch.
                if let Err(fault) = environment.store.save(&bundle) {
                    tracing::warn!(%fault, "failed to persist session");
                }
                dispatcher.send(SessionEvent::SessionPersisted);
            }
            Self::CancelFetch => dispatcher.send(SessionEvent::Cancelled),
        }
    }
}
