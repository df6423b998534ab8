//! Minimal contracts every state machine instance implements.

pub mod error;
pub mod event;
pub mod history;
pub mod resolution;
pub mod state;

pub use error::{AuthError, EnvironmentError};
pub use event::{Event, EventEnvelope, EventSender, EventSource};
pub use history::{StateHistory, StateTransition};
pub use resolution::{Resolver, StateResolution};
pub use state::State;
