//! The sign-out machine: a linear teardown run.
//!
//! A run optionally invalidates tokens on every device, optionally revokes
//! the refresh token, and always ends by clearing the local credential
//! store. The remote steps are best effort; only a failed local clear
//! leaves the machine in `Error`.
//!
//! # Examples
//!
//! ```
//! use authflow::core::Resolver;
//! use authflow::signout::{SignOutEvent, SignOutResolver, SignOutState};
//!
//! let resolver = SignOutResolver;
//! let resolution = resolver.resolve(
//!     &SignOutState::NotStarted,
//!     &SignOutEvent::InitiateSignOut {
//!         signed_in_data: None,
//!         global_sign_out: false,
//!     },
//! );
//! assert_eq!(resolution.actions.len(), 1);
//! ```

pub mod actions;
pub mod event;
pub mod resolver;
pub mod state;

pub use actions::SignOutAction;
pub use event::SignOutEvent;
pub use resolver::SignOutResolver;
pub use state::SignOutState;

use crate::machine::StateMachine;

/// The fully wired sign-out machine.
pub type SignOutStateMachine = StateMachine<SignOutResolver>;
