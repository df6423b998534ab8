//! Core State trait for state machine states.
//!
//! Every state a machine can occupy implements this trait. States are
//! immutable values; the trait only exposes pure inspection methods.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// A state is an immutable snapshot of one machine's current phase. The
/// discriminator returned by [`name`](State::name) is used for logging and
/// diagnostics only; transition logic always matches on the full value, so
/// equal discriminators with different payloads are still different states.
///
/// # Required Traits
///
/// - `Clone`: states are captured in history records and watch channels
/// - `PartialEq`: the dispatcher publishes a state only when it differs by
///   full value equality from the previous one
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states must be serializable for persistence
///
/// # Example
///
/// ```rust
/// use authflow::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum HandshakeState {
///     NotStarted,
///     AwaitingChallenge,
///     SignedIn,
///     Error,
/// }
///
/// impl State for HandshakeState {
///     fn name(&self) -> &str {
///         match self {
///             Self::NotStarted => "NotStarted",
///             Self::AwaitingChallenge => "AwaitingChallenge",
///             Self::SignedIn => "SignedIn",
///             Self::Error => "Error",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::SignedIn | Self::Error)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Error)
///     }
/// }
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's stable discriminator for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a terminal state for the current protocol run.
    ///
    /// From a terminal state only an explicit restart event may produce a
    /// transition; every other event resolves as a no-op.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Error states are terminal; the failure they carry is data, not a
    /// thrown error.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        NotStarted,
        InProgress,
        SignedIn,
        Error,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::NotStarted => "NotStarted",
                Self::InProgress => "InProgress",
                Self::SignedIn => "SignedIn",
                Self::Error => "Error",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::SignedIn | Self::Error)
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Error)
        }
    }

    #[test]
    fn name_returns_stable_discriminator() {
        assert_eq!(TestState::NotStarted.name(), "NotStarted");
        assert_eq!(TestState::InProgress.name(), "InProgress");
        assert_eq!(TestState::SignedIn.name(), "SignedIn");
        assert_eq!(TestState::Error.name(), "Error");
    }

    #[test]
    fn is_final_identifies_terminal_states() {
        assert!(!TestState::NotStarted.is_final());
        assert!(!TestState::InProgress.is_final());
        assert!(TestState::SignedIn.is_final());
        assert!(TestState::Error.is_final());
    }

    #[test]
    fn is_error_identifies_error_states() {
        assert!(!TestState::SignedIn.is_error());
        assert!(TestState::Error.is_error());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::InProgress;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn states_compare_by_full_value() {
        assert_eq!(TestState::InProgress, TestState::InProgress);
        assert_ne!(TestState::InProgress, TestState::SignedIn);
    }
}
