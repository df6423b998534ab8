//! The closed event union of the session pipeline.

use crate::core::{AuthError, Event};
use crate::types::{AwsCredentials, CredentialBundle, IdentityId};

/// Events understood by the session machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Run the one-time legacy store migration before the first fetch.
    MigrateLegacyStore,
    /// Emitted by the migration action, populated store or not.
    MigrationCompleted,
    /// Start a fresh session fetch.
    Initialize,
    /// The cached bundle was loaded, or `None` when the store is empty.
    CachedCredentialsFetched(Option<CredentialBundle>),
    /// The identity pool resolved an identity id.
    IdentityFetched(IdentityId),
    /// Scoped credentials were exchanged for the identity.
    AwsCredentialsFetched(AwsCredentials),
    /// The established session was written back to the store.
    SessionPersisted,
    /// Re-run the identity and credential stages of an established session.
    Refresh,
    /// Cooperatively cancel the fetch in flight.
    Cancel,
    /// Emitted by the cancel action; advances `Cancelling`.
    Cancelled,
    ThrowError(AuthError),
}

impl Event for SessionEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::MigrateLegacyStore => "MigrateLegacyStore",
            Self::MigrationCompleted => "MigrationCompleted",
            Self::Initialize => "Initialize",
            Self::CachedCredentialsFetched(_) => "CachedCredentialsFetched",
            Self::IdentityFetched(_) => "IdentityFetched",
            Self::AwsCredentialsFetched(_) => "AWSCredentialsFetched",
            Self::SessionPersisted => "SessionPersisted",
            Self::Refresh => "Refresh",
            Self::Cancel => "Cancel",
            Self::Cancelled => "Cancelled",
            Self::ThrowError(_) => "ThrowError",
        }
    }

    fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancel)
    }
}
