//! Shared test doubles: scripted environment capabilities and a watch
//! helper for awaiting machine states.

#![allow(dead_code)]

use async_trait::async_trait;
use authflow::core::EnvironmentError;
use authflow::environment::{
    AuthEnvironment, AuthProviderClient, Clock, CredentialStore, IdentityClient, SrpClientBehavior,
};
use authflow::types::{
    AwsCredentials, ChallengeOutcome, CredentialBundle, DeviceMetadata, IdentityId,
    LegacyCredentials, LegacyStoreLocation, LoginsMap, SignedInData, SrpChallenge, SrpProof,
    UserPoolTokens,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub fn valid_tokens() -> UserPoolTokens {
    tokens_valid_until(Utc::now() + ChronoDuration::hours(1))
}

pub fn tokens_valid_until(expiry: DateTime<Utc>) -> UserPoolTokens {
    UserPoolTokens {
        access_token: "access-token".into(),
        id_token: "id-token".into(),
        refresh_token: "refresh-token".into(),
        expiry,
    }
}

pub fn credentials_valid_until(expiry: DateTime<Utc>) -> AwsCredentials {
    AwsCredentials {
        access_key_id: "AKIATEST".into(),
        secret_access_key: "secret".into(),
        session_token: "session".into(),
        expiry,
    }
}

pub fn signed_in_data(username: &str) -> SignedInData {
    SignedInData {
        username: username.into(),
        signed_in_at: Utc::now(),
        tokens: valid_tokens(),
    }
}

fn server_challenge() -> SrpChallenge {
    SrpChallenge {
        username: None,
        salt: "00ff".into(),
        secret_block: "c2VjcmV0".into(),
        srp_b: "ab12".into(),
    }
}

/// Scripted user pool provider recording every call.
#[derive(Default)]
pub struct MockAuthProvider {
    pub initiated: Mutex<Vec<String>>,
    pub verified: Mutex<Vec<String>>,
    pub device_initiated: Mutex<Vec<String>>,
    pub device_verified: Mutex<Vec<String>>,
    pub global_sign_outs: Mutex<Vec<String>>,
    pub revoked_tokens: Mutex<Vec<String>>,
    pub fail_initiate: Option<EnvironmentError>,
    pub fail_verify: Option<EnvironmentError>,
    pub fail_global_sign_out: Option<EnvironmentError>,
    pub fail_revoke: Option<EnvironmentError>,
    /// Returned by the verify step; a signed-in outcome when unset.
    pub next_outcome: Option<ChallengeOutcome>,
    pub initiate_delay: Option<Duration>,
}

impl MockAuthProvider {
    fn outcome_for(&self, username: &str) -> ChallengeOutcome {
        self.next_outcome
            .clone()
            .unwrap_or_else(|| ChallengeOutcome::SignedIn(signed_in_data(username)))
    }
}

#[async_trait]
impl AuthProviderClient for MockAuthProvider {
    async fn initiate_auth(&self, username: &str) -> Result<SrpChallenge, EnvironmentError> {
        self.initiated.lock().unwrap().push(username.into());
        if let Some(delay) = self.initiate_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(fault) = &self.fail_initiate {
            return Err(fault.clone());
        }
        Ok(server_challenge())
    }

    async fn verify_challenge(
        &self,
        username: &str,
        _proof: &SrpProof,
    ) -> Result<ChallengeOutcome, EnvironmentError> {
        self.verified.lock().unwrap().push(username.into());
        if let Some(fault) = &self.fail_verify {
            return Err(fault.clone());
        }
        Ok(self.outcome_for(username))
    }

    async fn initiate_device_auth(
        &self,
        username: &str,
        _device: &DeviceMetadata,
    ) -> Result<SrpChallenge, EnvironmentError> {
        self.device_initiated.lock().unwrap().push(username.into());
        if let Some(fault) = &self.fail_initiate {
            return Err(fault.clone());
        }
        Ok(server_challenge())
    }

    async fn verify_device_challenge(
        &self,
        username: &str,
        _device: &DeviceMetadata,
        _proof: &SrpProof,
    ) -> Result<ChallengeOutcome, EnvironmentError> {
        self.device_verified.lock().unwrap().push(username.into());
        if let Some(fault) = &self.fail_verify {
            return Err(fault.clone());
        }
        Ok(self.outcome_for(username))
    }

    async fn global_sign_out(&self, access_token: &str) -> Result<(), EnvironmentError> {
        self.global_sign_outs.lock().unwrap().push(access_token.into());
        match &self.fail_global_sign_out {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    async fn revoke_token(&self, refresh_token: &str) -> Result<(), EnvironmentError> {
        self.revoked_tokens.lock().unwrap().push(refresh_token.into());
        match &self.fail_revoke {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }
}

/// Scripted identity pool counting calls and recording the logins maps it
/// was handed.
pub struct MockIdentityClient {
    pub resolve_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub logins_seen: Mutex<Vec<LoginsMap>>,
    pub fail_resolve: Option<EnvironmentError>,
    pub fail_exchange: Option<EnvironmentError>,
    pub identity_id: String,
    pub credentials_expiry: Mutex<DateTime<Utc>>,
}

impl Default for MockIdentityClient {
    fn default() -> Self {
        Self {
            resolve_calls: AtomicUsize::new(0),
            exchange_calls: AtomicUsize::new(0),
            logins_seen: Mutex::new(Vec::new()),
            fail_resolve: None,
            fail_exchange: None,
            identity_id: "identity-123".into(),
            credentials_expiry: Mutex::new(Utc::now() + ChronoDuration::hours(1)),
        }
    }
}

impl MockIdentityClient {
    pub fn set_credentials_expiry(&self, expiry: DateTime<Utc>) {
        *self.credentials_expiry.lock().unwrap() = expiry;
    }
}

#[async_trait]
impl IdentityClient for MockIdentityClient {
    async fn resolve_identity(&self, logins: &LoginsMap) -> Result<IdentityId, EnvironmentError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.logins_seen.lock().unwrap().push(logins.clone());
        if let Some(fault) = &self.fail_resolve {
            return Err(fault.clone());
        }
        Ok(IdentityId(self.identity_id.clone()))
    }

    async fn exchange_for_credentials(
        &self,
        _identity_id: &IdentityId,
        logins: &LoginsMap,
    ) -> Result<AwsCredentials, EnvironmentError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.logins_seen.lock().unwrap().push(logins.clone());
        if let Some(fault) = &self.fail_exchange {
            return Err(fault.clone());
        }
        Ok(credentials_valid_until(
            *self.credentials_expiry.lock().unwrap(),
        ))
    }
}

/// In-memory credential store counting writes and clears.
#[derive(Default)]
pub struct MockStore {
    pub bundle: Mutex<Option<CredentialBundle>>,
    pub legacy: Mutex<HashMap<LegacyStoreLocation, LegacyCredentials>>,
    pub saves: AtomicUsize,
    pub clears: AtomicUsize,
    pub fail_load: bool,
    pub fail_save: bool,
}

impl MockStore {
    pub fn with_bundle(bundle: CredentialBundle) -> Self {
        Self {
            bundle: Mutex::new(Some(bundle)),
            ..Self::default()
        }
    }

    pub fn with_legacy(entries: Vec<(LegacyStoreLocation, LegacyCredentials)>) -> Self {
        Self {
            legacy: Mutex::new(entries.into_iter().collect()),
            ..Self::default()
        }
    }
}

impl CredentialStore for MockStore {
    fn load(&self) -> Result<Option<CredentialBundle>, EnvironmentError> {
        if self.fail_load {
            return Err(EnvironmentError::Store("load failed".into()));
        }
        Ok(self.bundle.lock().unwrap().clone())
    }

    fn save(&self, bundle: &CredentialBundle) -> Result<(), EnvironmentError> {
        if self.fail_save {
            return Err(EnvironmentError::Store("save failed".into()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.bundle.lock().unwrap() = Some(bundle.clone());
        Ok(())
    }

    fn load_legacy(
        &self,
        location: LegacyStoreLocation,
    ) -> Result<Option<LegacyCredentials>, EnvironmentError> {
        Ok(self.legacy.lock().unwrap().get(&location).cloned())
    }

    fn clear_legacy(&self, location: LegacyStoreLocation) -> Result<(), EnvironmentError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.legacy.lock().unwrap().remove(&location);
        Ok(())
    }
}

/// Proof computation stub.
#[derive(Default)]
pub struct MockSrp {
    pub fail: Option<EnvironmentError>,
}

impl SrpClientBehavior for MockSrp {
    fn compute_challenge_response(
        &self,
        _username: &str,
        _password: &str,
        challenge: &SrpChallenge,
    ) -> Result<SrpProof, EnvironmentError> {
        if let Some(fault) = &self.fail {
            return Err(fault.clone());
        }
        Ok(SrpProof {
            claim_signature: "claim-signature".into(),
            secret_block: challenge.secret_block.clone(),
            timestamp: Utc::now(),
        })
    }
}

/// Settable clock shared between a test and the environment.
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Wire the capability bag from mocks, defaulting the proof stub.
pub fn environment(
    provider: Arc<MockAuthProvider>,
    identity: Arc<MockIdentityClient>,
    store: Arc<MockStore>,
    clock: Arc<dyn Clock>,
) -> Arc<AuthEnvironment> {
    environment_with_srp(provider, identity, store, Arc::new(MockSrp::default()), clock)
}

pub fn environment_with_srp(
    provider: Arc<MockAuthProvider>,
    identity: Arc<MockIdentityClient>,
    store: Arc<MockStore>,
    srp: Arc<MockSrp>,
    clock: Arc<dyn Clock>,
) -> Arc<AuthEnvironment> {
    Arc::new(AuthEnvironment {
        provider,
        identity,
        store,
        srp,
        clock,
        login_provider: "user-pool".into(),
    })
}

/// Await the first observed state matching `predicate`, with a timeout.
pub async fn wait_until<S, F>(rx: &mut watch::Receiver<S>, mut predicate: F) -> S
where
    S: Clone,
    F: FnMut(&S) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let state = rx.borrow_and_update();
                if predicate(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.expect("machine dropped");
        }
    })
    .await
    .expect("timed out waiting for state")
}
