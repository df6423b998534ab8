//! The credential-session pipeline: cached bundle, federated identity,
//! scoped credentials.
//!
//! The machine is a linear fetch pipeline with stage skipping driven by
//! cached results; [`SessionCoordinator`] wraps it in an async request
//! API that coalesces concurrent callers. The one-time legacy store
//! migration runs through the same machine before the first fetch.

pub mod actions;
pub mod coordinator;
pub mod event;
mod migration;
pub mod resolver;
pub mod state;

pub use actions::SessionAction;
pub use coordinator::SessionCoordinator;
pub use event::SessionEvent;
pub use resolver::SessionResolver;
pub use state::{SessionData, SessionState, TokenResult};

use crate::machine::StateMachine;

/// The fully wired session machine.
pub type SessionStateMachine = StateMachine<SessionResolver>;
