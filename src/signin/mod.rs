//! The sign-in machine: an SRP-style handshake expressed as a composite
//! state machine.
//!
//! The parent state owns one of two child machines, plain SRP or the
//! device-bound variant, selected at initiate time. Protocol-step events
//! are routed to the owning child and child terminals are lifted into
//! the parent `SignedIn` and `Error` states.
//!
//! # Examples
//!
//! Resolvers are pure and can be driven directly:
//!
//! ```
//! use authflow::core::Resolver;
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
//! assert_eq!(resolution.actions.len(), 1);
//! ```

pub mod actions;
pub mod device_srp;
pub mod event;
pub mod resolver;
pub mod srp;
pub mod state;

pub use actions::{DeviceSrpAction, SignInAction, SrpAction};
pub use device_srp::{DeviceSrpSignInResolver, DeviceSrpSignInState, DeviceSrpStateData};
pub use event::{DeviceSrpSignInEvent, SignInEvent, SrpSignInEvent};
pub use resolver::SignInResolver;
pub use srp::{SrpSignInResolver, SrpSignInState, SrpStateData};
pub use state::SignInState;

use crate::machine::StateMachine;

/// The fully wired sign-in machine.
pub type SignInStateMachine = StateMachine<SignInResolver>;
