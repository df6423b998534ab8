//! The environment: an opaque, read-only bag of capabilities supplied by
//! external collaborators, resolved once at machine construction.
//!
//! Actions receive the environment by reference and never mutate it. Every
//! capability reports failures as [`EnvironmentError`]; actions classify
//! those into [`AuthError`](crate::core::AuthError) before emitting events.

use crate::core::EnvironmentError;
use crate::types::{
    AwsCredentials, ChallengeOutcome, CredentialBundle, DeviceMetadata, IdentityId,
    LegacyCredentials, LegacyStoreLocation, LoginsMap, SrpChallenge, SrpProof, UserPoolTokens,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Network operations of the user pool provider used by the sign-in
/// handshake.
#[async_trait]
pub trait AuthProviderClient: Send + Sync {
    /// Start the SRP handshake; returns the server challenge.
    async fn initiate_auth(&self, username: &str) -> Result<SrpChallenge, EnvironmentError>;

    /// Submit the password proof for the server challenge.
    async fn verify_challenge(
        &self,
        username: &str,
        proof: &SrpProof,
    ) -> Result<ChallengeOutcome, EnvironmentError>;

    /// Device-bound variant of [`initiate_auth`](Self::initiate_auth).
    async fn initiate_device_auth(
        &self,
        username: &str,
        device: &DeviceMetadata,
    ) -> Result<SrpChallenge, EnvironmentError>;

    /// Device-bound variant of [`verify_challenge`](Self::verify_challenge).
    async fn verify_device_challenge(
        &self,
        username: &str,
        device: &DeviceMetadata,
        proof: &SrpProof,
    ) -> Result<ChallengeOutcome, EnvironmentError>;

    /// Invalidate every token issued for the user, on all devices.
    async fn global_sign_out(&self, access_token: &str) -> Result<(), EnvironmentError>;

    /// Revoke the refresh token so it can no longer mint access tokens.
    async fn revoke_token(&self, refresh_token: &str) -> Result<(), EnvironmentError>;
}

/// Federated identity operations used by the session pipeline.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Resolve a federated identity identifier for the logins map. An empty
    /// map resolves an unauthenticated (guest) identity.
    async fn resolve_identity(&self, logins: &LoginsMap) -> Result<IdentityId, EnvironmentError>;

    /// Exchange an identity identifier (and tokens, if present) for
    /// temporary credentials.
    async fn exchange_for_credentials(
        &self,
        identity_id: &IdentityId,
        logins: &LoginsMap,
    ) -> Result<AwsCredentials, EnvironmentError>;
}

/// Secure credential storage. The state machine serializes the logical
/// operations that write here, so writers are last-writer-wins with no
/// finer-grained locking.
pub trait CredentialStore: Send + Sync {
    /// Read the unified credential bundle.
    fn load(&self) -> Result<Option<CredentialBundle>, EnvironmentError>;

    /// Write the unified credential bundle.
    fn save(&self, bundle: &CredentialBundle) -> Result<(), EnvironmentError>;

    /// Read one legacy store location.
    fn load_legacy(
        &self,
        location: LegacyStoreLocation,
    ) -> Result<Option<LegacyCredentials>, EnvironmentError>;

    /// Remove everything stored at one legacy location.
    fn clear_legacy(&self, location: LegacyStoreLocation) -> Result<(), EnvironmentError>;
}

/// Opaque capability computing the password proof for a server challenge.
/// The cryptographic math lives behind this seam.
pub trait SrpClientBehavior: Send + Sync {
    fn compute_challenge_response(
        &self,
        username: &str,
        password: &str,
        challenge: &SrpChallenge,
    ) -> Result<SrpProof, EnvironmentError>;
}

/// Clock capability so expiry checks are testable. Explicitly passed on the
/// environment rather than read from process-wide state.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside of tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The full capability bag consumed by sign-in and session actions.
#[derive(Clone)]
pub struct AuthEnvironment {
    pub provider: Arc<dyn AuthProviderClient>,
    pub identity: Arc<dyn IdentityClient>,
    pub store: Arc<dyn CredentialStore>,
    pub srp: Arc<dyn SrpClientBehavior>,
    pub clock: Arc<dyn Clock>,
    /// Key under which user pool tokens appear in the logins map handed to
    /// identity resolution.
    pub login_provider: String,
}

impl AuthEnvironment {
    /// Build the logins map for identity resolution. No tokens means an
    /// empty map, the unauthenticated path.
    pub fn logins_for(&self, tokens: Option<&UserPoolTokens>) -> LoginsMap {
        match tokens {
            Some(tokens) => {
                LoginsMap::from([(self.login_provider.clone(), tokens.id_token.clone())])
            }
            None => LoginsMap::new(),
        }
    }
}
