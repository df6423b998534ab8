//! One-time migration of the legacy store layout into the unified bundle.
//!
//! Reads every legacy location, folds what it finds into one bundle
//! (first value per slot wins, in location order), writes the bundle once
//! and clears only the locations that held data. An empty legacy store
//! performs zero writes and zero clears, so re-running is harmless.

use super::event::SessionEvent;
use crate::core::{AuthError, EventSender};
use crate::environment::AuthEnvironment;
use crate::types::{CredentialBundle, LegacyStoreLocation};

pub(crate) fn run(dispatcher: &EventSender<SessionEvent>, environment: &AuthEnvironment) {
    let mut bundle = CredentialBundle::default();
    let mut populated: Vec<LegacyStoreLocation> = Vec::new();

    for location in LegacyStoreLocation::all() {
        match environment.store.load_legacy(location) {
            Ok(Some(legacy)) => {
                populated.push(location);
                bundle.absorb(legacy);
            }
            Ok(None) => {}
            Err(fault) => {
                // Nothing was written yet; the legacy data stays intact for
                // the next attempt.
                let error = AuthError::classify(fault);
                tracing::warn!(%error, ?location, "legacy store read failed");
                dispatcher.send(SessionEvent::ThrowError(error));
                return;
            }
        }
    }

    if bundle.is_empty() {
        dispatcher.send(SessionEvent::MigrationCompleted);
        return;
    }

    if let Err(fault) = environment.store.save(&bundle) {
        let error = AuthError::classify(fault);
        tracing::warn!(%error, "migrated bundle write failed");
        dispatcher.send(SessionEvent::ThrowError(error));
        return;
    }

    for location in populated {
        // The bundle is already saved; a location that fails to clear is
        // re-read on the next migration and folds to the same bundle.
        if let Err(fault) = environment.store.clear_legacy(location) {
            tracing::warn!(%fault, ?location, "legacy store clear failed");
        }
    }

    tracing::info!("legacy credentials migrated");
    dispatcher.send(SessionEvent::MigrationCompleted);
}
