//! States of the credential-session pipeline.

use crate::core::{AuthError, State};
use crate::types::{AwsCredentials, CredentialBundle, IdentityId, Session, UserPoolTokens};
use serde::{Deserialize, Serialize};

/// Outcome of the token-loading stage.
///
/// `SignedOut` is a positive result: the store was consulted and no user
/// is signed in, so the pipeline proceeds unauthenticated.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TokenResult {
    NotFetched,
    Fetched(UserPoolTokens),
    SignedOut,
}

impl TokenResult {
    pub fn tokens(&self) -> Option<&UserPoolTokens> {
        match self {
            Self::Fetched(tokens) => Some(tokens),
            _ => None,
        }
    }
}

/// Accumulated pipeline results, carried through the fetching states.
///
/// Each stage replaces exactly one field via the `with_*` constructors,
/// leaving sibling results untouched.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub tokens: TokenResult,
    pub identity_id: Option<IdentityId>,
    pub credentials: Option<AwsCredentials>,
}

impl SessionData {
    pub fn empty() -> Self {
        Self {
            tokens: TokenResult::NotFetched,
            identity_id: None,
            credentials: None,
        }
    }

    pub fn with_tokens(&self, tokens: TokenResult) -> Self {
        Self {
            tokens,
            ..self.clone()
        }
    }

    pub fn with_identity_id(&self, identity_id: Option<IdentityId>) -> Self {
        Self {
            identity_id,
            ..self.clone()
        }
    }

    pub fn with_credentials(&self, credentials: Option<AwsCredentials>) -> Self {
        Self {
            credentials,
            ..self.clone()
        }
    }

    pub fn from_bundle(bundle: &CredentialBundle) -> Self {
        Self {
            tokens: match &bundle.tokens {
                Some(tokens) => TokenResult::Fetched(tokens.clone()),
                None => TokenResult::SignedOut,
            },
            identity_id: bundle.identity_id.clone(),
            credentials: bundle.credentials.clone(),
        }
    }
}

/// Phases of the session pipeline.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SessionState {
    Uninitialized,
    MigratingLegacyStore,
    FetchingUserPoolTokens(SessionData),
    FetchingIdentity(SessionData),
    FetchingAwsCredentials(SessionData),
    Established(Session),
    Cancelling,
    Error(AuthError),
}

impl State for SessionState {
    fn name(&self) -> &str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::MigratingLegacyStore => "MigratingLegacyStore",
            Self::FetchingUserPoolTokens(_) => "FetchingUserPoolTokens",
            Self::FetchingIdentity(_) => "FetchingIdentity",
            Self::FetchingAwsCredentials(_) => "FetchingAWSCredentials",
            Self::Established(_) => "Established",
            Self::Cancelling => "Cancelling",
            Self::Error(_) => "Error",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Established(_) | Self::Error(_))
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tokens() -> UserPoolTokens {
        UserPoolTokens {
            access_token: "access".into(),
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expiry: Utc::now(),
        }
    }

    #[test]
    fn with_constructors_replace_exactly_one_field() {
        let base = SessionData::empty()
            .with_tokens(TokenResult::Fetched(tokens()))
            .with_identity_id(Some(IdentityId("id-123".into())));

        let updated = base.with_credentials(Some(AwsCredentials {
            access_key_id: "AKIA".into(),
            secret_access_key: "secret".into(),
            session_token: "session".into(),
            expiry: Utc::now(),
        }));

        assert_eq!(updated.tokens, base.tokens);
        assert_eq!(updated.identity_id, base.identity_id);
        assert!(updated.credentials.is_some());
    }

    #[test]
    fn signed_out_carries_no_tokens() {
        assert!(TokenResult::SignedOut.tokens().is_none());
        assert!(TokenResult::NotFetched.tokens().is_none());
        assert!(TokenResult::Fetched(tokens()).tokens().is_some());
    }

    #[test]
    fn bundle_without_tokens_maps_to_signed_out() {
        let bundle = CredentialBundle {
            identity_id: Some(IdentityId("id-123".into())),
            tokens: None,
            credentials: None,
        };
        let data = SessionData::from_bundle(&bundle);
        assert_eq!(data.tokens, TokenResult::SignedOut);
        assert_eq!(data.identity_id, Some(IdentityId("id-123".into())));
    }

    #[test]
    fn terminal_states_are_final() {
        assert!(SessionState::Error(AuthError::Service("boom".into())).is_final());
        assert!(!SessionState::Uninitialized.is_final());
        assert!(!SessionState::Cancelling.is_final());
    }
}
