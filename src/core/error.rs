//! Error taxonomy for authentication flows.
//!
//! Resolvers never throw; every failure is represented as data carried in an
//! `Error` state or an event payload. Actions classify raw environment
//! faults into [`AuthError`] before they cross the Action → Event boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified authentication error.
///
/// The only error kinds a caller ever needs to render. `Validation` is
/// produced synchronously before any action runs; `NotAuthorized` and
/// `Configuration` are terminal; `Service` is retryable by re-issuing the
/// triggering event.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, Error)]
pub enum AuthError {
    /// Input rejected locally before any action ran.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The provider rejected the supplied credentials or identity.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// A required environment capability is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport or service failure, classified at the action boundary.
    #[error("service error: {0}")]
    Service(String),
}

impl AuthError {
    /// Stable discriminator for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation",
            Self::NotAuthorized(_) => "NotAuthorized",
            Self::Configuration(_) => "Configuration",
            Self::Service(_) => "Service",
        }
    }

    /// Classify a raw environment fault into a typed error.
    ///
    /// Anything that is not an explicit authorization rejection defaults to
    /// the service kind rather than crashing the pipeline.
    pub fn classify(fault: EnvironmentError) -> Self {
        match fault {
            EnvironmentError::NotAuthorized(message) => Self::NotAuthorized(message),
            EnvironmentError::Transport(message) | EnvironmentError::Store(message) => {
                Self::Service(message)
            }
        }
    }
}

/// Raw fault reported by an environment capability, before classification.
///
/// Actions never let this type cross into an event payload.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum EnvironmentError {
    /// The remote service rejected the caller's credentials or identity.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// Network or remote service failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Secure storage failure.
    #[error("storage failure: {0}")]
    Store(String),
}
