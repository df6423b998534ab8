//! Data types shared between the sign-in protocol and the session pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Login tokens map handed to federated identity resolution. Empty means
/// unauthenticated (guest) access.
pub type LoginsMap = HashMap<String, String>;

/// Tokens issued by the user pool after a completed sign-in.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UserPoolTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expiry: DateTime<Utc>,
}

impl UserPoolTokens {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

/// Federated identity identifier resolved for a logins map.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IdentityId(pub String);

/// Temporary cloud credentials exchanged for an identity.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiry: DateTime<Utc>,
}

impl AwsCredentials {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

/// Unified credential bundle persisted in the secure store.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct CredentialBundle {
    pub identity_id: Option<IdentityId>,
    pub tokens: Option<UserPoolTokens>,
    pub credentials: Option<AwsCredentials>,
}

impl CredentialBundle {
    /// Fold a legacy record into this bundle; the first value found for each
    /// slot wins.
    pub fn absorb(&mut self, legacy: LegacyCredentials) {
        if self.identity_id.is_none() {
            self.identity_id = legacy.identity_id;
        }
        if self.tokens.is_none() {
            self.tokens = legacy.tokens;
        }
        if self.credentials.is_none() {
            self.credentials = legacy.credentials;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identity_id.is_none() && self.tokens.is_none() && self.credentials.is_none()
    }
}

/// Credentials as stored by the legacy layout, one record per location.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct LegacyCredentials {
    pub username: Option<String>,
    pub identity_id: Option<IdentityId>,
    pub tokens: Option<UserPoolTokens>,
    pub credentials: Option<AwsCredentials>,
}

/// The legacy storage locations the one-time migration reads and clears.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum LegacyStoreLocation {
    UserPool,
    IdentityPool,
    AwsCredentials,
}

impl LegacyStoreLocation {
    /// Every legacy location, in migration order.
    pub fn all() -> [Self; 3] {
        [Self::UserPool, Self::IdentityPool, Self::AwsCredentials]
    }
}

/// An established session: the product of the credential pipeline.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Session {
    pub identity_id: IdentityId,
    pub credentials: AwsCredentials,
    /// Absent for unauthenticated (guest) sessions.
    pub tokens: Option<UserPoolTokens>,
}

/// Result of a completed sign-in handshake.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignedInData {
    pub username: String,
    pub signed_in_at: DateTime<Utc>,
    pub tokens: UserPoolTokens,
}

/// Server challenge returned by the initiate-auth call of the SRP handshake.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SrpChallenge {
    /// Canonical username as reported by the server, when it differs from
    /// the one submitted.
    pub username: Option<String>,
    pub salt: String,
    pub secret_block: String,
    pub srp_b: String,
}

/// Password proof computed from the server challenge. The cryptographic math
/// behind it is an opaque environment capability.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SrpProof {
    pub claim_signature: String,
    pub secret_block: String,
    pub timestamp: DateTime<Utc>,
}

/// An additional interactive challenge requested by the provider after the
/// password proof was accepted.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChallengeData {
    pub challenge_name: String,
    pub parameters: HashMap<String, String>,
}

/// Outcome of submitting a password proof.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    SignedIn(SignedInData),
    NextChallenge(ChallengeData),
}

/// Metadata identifying a remembered device, threaded through the
/// device-bound sign-in variant.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub device_key: String,
    pub device_group_key: String,
}
