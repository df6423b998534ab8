//! Authflow: an event-driven state machine engine for authentication flows
//!
//! Authflow keeps a pure core behind an imperative shell. Resolvers are
//! pure functions from a state and an event to a [`StateResolution`]; all
//! side effects live in actions, which run on the shell and feed their
//! results back into the machine as events.
//!
//! Two machines are built on the engine:
//!
//! - **Sign-in**: an SRP-style handshake, composed of a parent lifecycle
//!   machine and SRP / device-SRP child machines
//! - **Session**: the credential pipeline from cached bundle through
//!   federated identity to scoped credentials, fronted by a coalescing
//!   [`SessionCoordinator`](session::SessionCoordinator)
//!
//! A third, smaller machine handles sign-out: best-effort remote teardown
//! followed by a local credential clear.
//!
//! # Example
//!
//! Resolvers are pure, so a transition can be checked without a runtime:
//!
//! ```rust
//! use authflow::core::{Resolver, State};
//! use authflow::signin::{SignInEvent, SignInResolver, SignInState};
//!
//! let resolver = SignInResolver::new();
//! let resolution = resolver.resolve(
//!     &SignInState::NotStarted,
//!     &SignInEvent::InitiateSignIn {
//!         username: "alice".into(),
//!         password: "pw123".into(),
//!         device_metadata: None,
//!     },
//! );
//! assert_eq!(resolution.new_state.is_final(), false);
//! assert_eq!(resolution.actions.len(), 1);
//! ```

pub mod core;
pub mod environment;
pub mod machine;
pub mod session;
pub mod signin;
pub mod signout;
pub mod types;

// Re-export commonly used types
pub use crate::core::{
    AuthError, EnvironmentError, Event, Resolver, State, StateHistory, StateResolution,
    StateTransition,
};
pub use crate::environment::AuthEnvironment;
pub use crate::machine::{Action, StateMachine};
