//! Single-slot session storage for the latest itinerary

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Local};
use tracing::debug;

use super::Itinerary;

/// The itinerary currently held by the session, with what it was made for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    /// Destination as typed by the user; used for the download filename
    pub destination: String,
    pub itinerary: Itinerary,
    pub generated_at: DateTime<Local>,
}

/// Holds at most one itinerary, replaced wholesale on each successful run
///
/// Passed by reference to the orchestrator (writer) and the front-end
/// (reader). The slot sits behind a lock so a replace is atomic even if
/// runs ever overlap.
#[derive(Debug, Default)]
pub struct SessionState {
    slot: RwLock<Option<SessionEntry>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored itinerary
    pub fn replace(&self, destination: impl Into<String>, itinerary: Itinerary) {
        let entry = SessionEntry {
            destination: destination.into(),
            itinerary,
            generated_at: Local::now(),
        };
        debug!(destination = %entry.destination, len = entry.itinerary.len(), "SessionState::replace: called");
        // The slot is only ever assigned whole, so a poisoned lock still holds a valid value
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(entry);
    }

    /// Snapshot of the current entry, if any
    pub fn current(&self) -> Option<SessionEntry> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Just the itinerary text of the current entry
    pub fn itinerary(&self) -> Option<Itinerary> {
        self.current().map(|e| e.itinerary)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}
