//! Property-based tests for the resolvers.
//!
//! These tests use proptest to verify resolver guarantees hold across
//! many randomly generated state and event combinations.

use authflow::core::{AuthError, Resolver, State};
use authflow::session::{SessionData, SessionEvent, SessionResolver, SessionState, TokenResult};
use authflow::signin::{
    DeviceSrpSignInEvent, DeviceSrpSignInState, DeviceSrpStateData, SignInEvent, SignInResolver,
    SignInState, SrpSignInEvent, SrpSignInState, SrpStateData,
};
use authflow::types::{
    AwsCredentials, ChallengeData, CredentialBundle, DeviceMetadata, IdentityId, Session,
    SignedInData, SrpChallenge, UserPoolTokens,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn tokens(offset_minutes: i64) -> UserPoolTokens {
    UserPoolTokens {
        access_token: "access".into(),
        id_token: "id".into(),
        refresh_token: "refresh".into(),
        expiry: Utc.timestamp_opt(1_700_000_000 + offset_minutes * 60, 0).unwrap(),
    }
}

fn credentials(offset_minutes: i64) -> AwsCredentials {
    AwsCredentials {
        access_key_id: "AKIA".into(),
        secret_access_key: "secret".into(),
        session_token: "session".into(),
        expiry: Utc.timestamp_opt(1_700_000_000 + offset_minutes * 60, 0).unwrap(),
    }
}

fn signed_in_data(username: &str) -> SignedInData {
    SignedInData {
        username: username.into(),
        signed_in_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        tokens: tokens(60),
    }
}

fn challenge() -> SrpChallenge {
    SrpChallenge {
        username: None,
        salt: "00ff".into(),
        secret_block: "c2VjcmV0".into(),
        srp_b: "ab12".into(),
    }
}

prop_compose! {
    fn arbitrary_error()(variant in 0..4u8, message in "[a-z]{1,12}") -> AuthError {
        match variant {
            0 => AuthError::Validation(message),
            1 => AuthError::NotAuthorized(message),
            2 => AuthError::Configuration(message),
            _ => AuthError::Service(message),
        }
    }
}

prop_compose! {
    fn arbitrary_srp_data()(username in "[a-z]{1,8}", password in "[a-z0-9]{1,8}") -> SrpStateData {
        SrpStateData { username, password }
    }
}

fn arbitrary_signin_state() -> impl Strategy<Value = SignInState> {
    prop_oneof![
        Just(SignInState::NotStarted),
        Just(SignInState::Cancelling),
        arbitrary_srp_data().prop_map(|data| {
            SignInState::SigningInWithSrp(SrpSignInState::InitiatingSrpA(data))
        }),
        arbitrary_srp_data().prop_map(|data| {
            SignInState::SigningInWithSrp(SrpSignInState::RespondingPasswordVerifier(data))
        }),
        arbitrary_srp_data().prop_map(|data| {
            SignInState::SigningInWithDeviceSrp(DeviceSrpSignInState::InitiatingDeviceSrpA(
                DeviceSrpStateData {
                    username: data.username,
                    password: data.password,
                    device_metadata: DeviceMetadata {
                        device_key: "device-key".into(),
                        device_group_key: "group-key".into(),
                    },
                },
            ))
        }),
        "[a-z]{1,8}".prop_map(|username| SignInState::SignedIn(signed_in_data(&username))),
        arbitrary_error().prop_map(SignInState::Error),
    ]
}

fn arbitrary_srp_event() -> impl Strategy<Value = SrpSignInEvent> {
    prop_oneof![
        Just(SrpSignInEvent::ServerChallenge(challenge())),
        "[a-z]{1,8}".prop_map(|username| SrpSignInEvent::Finalize(signed_in_data(&username))),
        Just(SrpSignInEvent::NextChallenge(ChallengeData {
            challenge_name: "SMS_MFA".into(),
            parameters: Default::default(),
        })),
        arbitrary_error().prop_map(SrpSignInEvent::ThrowPasswordVerifierError),
        arbitrary_error().prop_map(SrpSignInEvent::ThrowAuthError),
    ]
}

fn arbitrary_device_srp_event() -> impl Strategy<Value = DeviceSrpSignInEvent> {
    prop_oneof![
        Just(DeviceSrpSignInEvent::ServerChallenge(challenge())),
        "[a-z]{1,8}".prop_map(|username| {
            DeviceSrpSignInEvent::Finalize(signed_in_data(&username))
        }),
        arbitrary_error().prop_map(DeviceSrpSignInEvent::ThrowDeviceVerifierError),
        arbitrary_error().prop_map(DeviceSrpSignInEvent::ThrowAuthError),
    ]
}

fn arbitrary_signin_event() -> impl Strategy<Value = SignInEvent> {
    prop_oneof![
        ("[ a-z]{0,8}", "[a-z0-9]{1,8}").prop_map(|(username, password)| {
            SignInEvent::InitiateSignIn {
                username,
                password,
                device_metadata: None,
            }
        }),
        Just(SignInEvent::Cancel),
        Just(SignInEvent::Cancelled),
        Just(SignInEvent::Restart),
        arbitrary_srp_event().prop_map(SignInEvent::Srp),
        arbitrary_device_srp_event().prop_map(SignInEvent::DeviceSrp),
    ]
}

prop_compose! {
    fn arbitrary_session_data()(
        token_variant in 0..3u8,
        has_identity in any::<bool>(),
        has_credentials in any::<bool>(),
        offset in 0..240i64,
    ) -> SessionData {
        let tokens = match token_variant {
            0 => TokenResult::NotFetched,
            1 => TokenResult::SignedOut,
            _ => TokenResult::Fetched(tokens(offset)),
        };
        let mut data = SessionData::empty().with_tokens(tokens);
        if has_identity {
            data = data.with_identity_id(Some(IdentityId("identity-123".into())));
        }
        if has_credentials {
            data = data.with_credentials(Some(credentials(offset)));
        }
        data
    }
}

fn arbitrary_session_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::Uninitialized),
        Just(SessionState::MigratingLegacyStore),
        Just(SessionState::Cancelling),
        arbitrary_session_data().prop_map(SessionState::FetchingUserPoolTokens),
        arbitrary_session_data().prop_map(SessionState::FetchingIdentity),
        arbitrary_session_data().prop_map(SessionState::FetchingAwsCredentials),
        (0..240i64).prop_map(|offset| {
            SessionState::Established(Session {
                identity_id: IdentityId("identity-123".into()),
                credentials: credentials(offset),
                tokens: Some(tokens(offset)),
            })
        }),
        arbitrary_error().prop_map(SessionState::Error),
    ]
}

fn arbitrary_bundle() -> impl Strategy<Value = Option<CredentialBundle>> {
    proptest::option::of((0..240i64, any::<bool>()).prop_map(|(offset, has_identity)| {
        CredentialBundle {
            identity_id: has_identity.then(|| IdentityId("identity-123".into())),
            tokens: Some(tokens(offset)),
            credentials: None,
        }
    }))
}

fn arbitrary_session_event() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        Just(SessionEvent::MigrateLegacyStore),
        Just(SessionEvent::MigrationCompleted),
        Just(SessionEvent::Initialize),
        arbitrary_bundle().prop_map(SessionEvent::CachedCredentialsFetched),
        Just(SessionEvent::IdentityFetched(IdentityId("identity-123".into()))),
        (0..240i64).prop_map(|offset| SessionEvent::AwsCredentialsFetched(credentials(offset))),
        Just(SessionEvent::SessionPersisted),
        prop_oneof![
            Just(SessionEvent::Refresh),
            Just(SessionEvent::Cancel),
            Just(SessionEvent::Cancelled),
        ],
        arbitrary_error().prop_map(SessionEvent::ThrowError),
    ]
}

proptest! {
    #[test]
    fn signin_resolution_is_deterministic(
        state in arbitrary_signin_state(),
        event in arbitrary_signin_event(),
    ) {
        let resolver = SignInResolver::new();
        let first = resolver.resolve(&state, &event);
        let second = resolver.resolve(&state, &event);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn signin_identity_resolutions_carry_no_actions(
        state in arbitrary_signin_state(),
        event in arbitrary_signin_event(),
    ) {
        let resolver = SignInResolver::new();
        let resolution = resolver.resolve(&state, &event);
        if resolution.new_state == state {
            prop_assert!(resolution.actions.is_empty());
        }
    }

    #[test]
    fn signin_terminals_only_exit_via_restart(
        state in arbitrary_signin_state(),
        event in arbitrary_signin_event(),
    ) {
        prop_assume!(state.is_final());
        prop_assume!(!matches!(event, SignInEvent::Restart));

        let resolver = SignInResolver::new();
        let resolution = resolver.resolve(&state, &event);
        prop_assert_eq!(resolution.new_state, state);
        prop_assert!(resolution.actions.is_empty());
    }

    #[test]
    fn session_resolution_is_deterministic(
        state in arbitrary_session_state(),
        event in arbitrary_session_event(),
    ) {
        let resolver = SessionResolver;
        let first = resolver.resolve(&state, &event);
        let second = resolver.resolve(&state, &event);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn session_identity_resolutions_carry_no_actions(
        state in arbitrary_session_state(),
        event in arbitrary_session_event(),
    ) {
        let resolver = SessionResolver;
        let resolution = resolver.resolve(&state, &event);
        if resolution.new_state == state {
            prop_assert!(resolution.actions.is_empty());
        }
    }

    #[test]
    fn session_stage_completion_preserves_sibling_results(
        data in arbitrary_session_data(),
    ) {
        let resolver = SessionResolver;
        let resolution = resolver.resolve(
            &SessionState::FetchingIdentity(data.clone()),
            &SessionEvent::IdentityFetched(IdentityId("fresh-identity".into())),
        );

        match resolution.new_state {
            SessionState::FetchingAwsCredentials(updated) => {
                prop_assert_eq!(updated.tokens, data.tokens);
                prop_assert_eq!(updated.credentials, data.credentials);
                prop_assert_eq!(updated.identity_id, Some(IdentityId("fresh-identity".into())));
            }
            other => prop_assert!(false, "unexpected state {:?}", other),
        }
    }

    #[test]
    fn signin_child_delegation_is_lossless(
        data in arbitrary_srp_data(),
    ) {
        let resolver = SignInResolver::new();
        let state = SignInState::SigningInWithSrp(SrpSignInState::InitiatingSrpA(data.clone()));
        let resolution = resolver.resolve(
            &state,
            &SignInEvent::Srp(SrpSignInEvent::ServerChallenge(challenge())),
        );

        match resolution.new_state {
            SignInState::SigningInWithSrp(SrpSignInState::RespondingPasswordVerifier(kept)) => {
                prop_assert_eq!(kept, data);
            }
            other => prop_assert!(false, "unexpected state {:?}", other),
        }
    }
}
