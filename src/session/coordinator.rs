//! Read-side coordinator over the session machine.
//!
//! Callers ask for a session; the coordinator turns that into machine
//! events and observes the state stream until a terminal is reached. An
//! async mutex serializes callers, so concurrent requests coalesce onto
//! one pipeline run and later callers are served the established result.

use super::event::SessionEvent;
use super::resolver::SessionResolver;
use super::state::SessionState;
use super::SessionStateMachine;
use crate::core::AuthError;
use crate::environment::AuthEnvironment;
use crate::machine::StateMachine;
use crate::types::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the session machine and exposes an async request API over it.
pub struct SessionCoordinator {
    machine: SessionStateMachine,
    environment: Arc<AuthEnvironment>,
    gate: Mutex<()>,
}

impl SessionCoordinator {
    /// Build the coordinator and its machine. Must be called on a tokio
    /// runtime.
    pub fn new(environment: Arc<AuthEnvironment>) -> Self {
        let machine = StateMachine::new(
            SessionResolver,
            SessionState::Uninitialized,
            Arc::clone(&environment),
        );
        Self {
            machine,
            environment,
            gate: Mutex::new(()),
        }
    }

    /// Direct access to the underlying machine, for observation.
    pub fn machine(&self) -> &SessionStateMachine {
        &self.machine
    }

    /// Fold the legacy store layout into the unified bundle.
    ///
    /// Intended to run once at startup, before the first
    /// [`fetch_session`](Self::fetch_session). A no-op when the machine has
    /// already left `Uninitialized` or the legacy store is empty.
    pub async fn run_legacy_migration(&self) -> Result<(), AuthError> {
        let _guard = self.gate.lock().await;
        let mut rx = self.machine.observe();

        if *rx.borrow_and_update() != SessionState::Uninitialized {
            return Ok(());
        }
        self.machine.send(SessionEvent::MigrateLegacyStore);

        loop {
            rx.changed()
                .await
                .map_err(|_| AuthError::Configuration("session machine dropped".into()))?;
            let state = rx.borrow_and_update().clone();
            match state {
                SessionState::Uninitialized => return Ok(()),
                SessionState::Error(error) => return Err(error),
                _ => {}
            }
        }
    }

    /// Return the current session, running the fetch pipeline if there is
    /// no valid established session yet.
    ///
    /// Concurrent callers coalesce: the first drives the pipeline, the rest
    /// wait on the gate and are served the established result.
    pub async fn fetch_session(&self) -> Result<Session, AuthError> {
        let _guard = self.gate.lock().await;
        let mut rx = self.machine.observe();
        let mut attempted = false;

        loop {
            let state = rx.borrow_and_update().clone();
            match state {
                SessionState::Established(session) => {
                    let now = self.environment.clock.now();
                    if !session.credentials.is_expired(now) {
                        return Ok(session);
                    }
                    if attempted {
                        return Err(AuthError::Service(
                            "refreshed credentials are already expired".into(),
                        ));
                    }
                    attempted = true;
                    self.machine.send(SessionEvent::Refresh);
                }
                SessionState::Error(error) if attempted => return Err(error),
                SessionState::Uninitialized | SessionState::Error(_) if !attempted => {
                    attempted = true;
                    self.machine.send(SessionEvent::Initialize);
                }
                SessionState::Uninitialized => {
                    // A cancel raced in and unwound the fetch we started.
                    return Err(AuthError::Service("session fetch was cancelled".into()));
                }
                _ => {}
            }
            rx.changed()
                .await
                .map_err(|_| AuthError::Configuration("session machine dropped".into()))?;
        }
    }
}
